//! Rust开放寻址探测哈希表库
//!
//! 提供定长键值的开放寻址哈希表，线性探测解决冲突，删除使用墓碑标记。
//!
//! ## 主要特性
//! - 容量恒为2的幂，槽位定位使用位掩码
//! - 负载因子不超过1/2，扩容时整表重哈希并丢弃墓碑
//! - 每槽位2位的紧凑状态标志（空 / 占用 / 墓碑）
//! - 哈希与相等比较由调用方提供，也可通过 [`ProbeMap`] 在构造时绑定
//! - 操作统计与Prometheus指标导出
//!
//! ## 快速开始
//!
//! ```rust
//! use probe_hashtable::*;
//!
//! fn hash_int(key: &i32) -> u64 {
//!     *key as u64
//! }
//!
//! let mut table: ProbeTable<i32, i32> = ProbeTable::new();
//!
//! // 插入前先预留容量
//! table.reserve(2, hash_int).expect("预留失败");
//! table.insert(1, hash_int(&1), 3).expect("插入失败");
//! table.insert(5, hash_int(&5), 7).expect("插入失败");
//!
//! assert_eq!(table.get(&5, hash_int(&5), |a, b| a == b), Some(&7));
//! assert_eq!(table.remove(&1, hash_int(&1), |a, b| a == b), Some(3));
//!
//! table.destroy();
//! ```

#![warn(clippy::all)]

#[cfg(feature = "logging")]
#[doc(hidden)]
pub use log as __log;

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::__log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::__log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::__log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::__log::error!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

// 核心模块导出
pub mod error;
pub mod types;
pub mod memory;
pub mod hash;
pub mod map;
pub mod stats;

// 公共接口导出
pub use crate::{
    error::ProbeError,
    hash::{HashAlgorithm, HashStrategy, IdentityHasher, KeyHasher},
    map::{ProbeMap, ProbeMapConfig, ProbeTable, ProbeTableStats, DEFAULT_CONFIG, MAX_LOAD_FACTOR},
    memory::{SlotFlags, SlotStorage},
    stats::{AtomicOperationStats, DisabledOperationRecorder, OperationRecorder, OperationStatsSnapshot},
    types::{OperationType, SlotState},
};

// 便捷功能函数

/// 批量插入
///
/// 按迭代器下限一次性预留容量，返回插入的条目数。
pub fn batch_insert<K, V, H>(
    map: &mut ProbeMap<K, V, H>,
    items: impl IntoIterator<Item = (K, V)>,
) -> Result<usize, ProbeError>
where
    K: Eq,
    H: HashStrategy<K>,
{
    let items = items.into_iter();
    map.reserve(items.size_hint().0)?;

    let mut count = 0;
    for (key, value) in items {
        map.insert(key, value)?;
        count += 1;
    }
    log_info!("batch insert: {} entries, capacity {}", count, map.capacity());
    Ok(count)
}

/// 批量查询
pub fn batch_get<'a, K, V, H>(
    map: &'a ProbeMap<K, V, H>,
    keys: impl IntoIterator<Item = &'a K>,
) -> Vec<Option<&'a V>>
where
    K: Eq + 'a,
    H: HashStrategy<K>,
{
    keys.into_iter().map(|key| map.get(key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_operations() {
        let mut map: ProbeMap<u32, u32> = ProbeMap::new();
        let inserted = batch_insert(&mut map, (0..64).map(|i| (i, i * i))).unwrap();
        assert_eq!(inserted, 64);
        assert_eq!(map.capacity(), 128);

        let keys = [3, 64, 7];
        let found = batch_get(&map, keys.iter());
        assert_eq!(found, vec![Some(&9), None, Some(&49)]);
    }
}
