//! 哈希表核心模块 - 探测表及其封装

pub mod probe_map;
pub mod probe_table;

pub use probe_map::{ProbeMap, ProbeMapConfig};
pub use probe_table::{ProbeTable, ProbeTableStats};

use once_cell::sync::Lazy;

/// 全局默认配置
pub static DEFAULT_CONFIG: Lazy<ProbeMapConfig> = Lazy::new(ProbeMapConfig::default);

/// 负载因子上限（有效条目数 / 槽位数）
pub const MAX_LOAD_FACTOR: f32 = 0.5;
