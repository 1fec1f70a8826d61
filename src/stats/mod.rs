//! 统计模块 - 探测表操作计数与指标导出

pub mod operation;

use std::sync::Arc;

pub use operation::{
    AtomicOperationStats, DisabledOperationRecorder, OperationRecorder, OperationStatsSnapshot,
};

/// 按开关创建统计记录器
pub fn recorder(enabled: bool) -> Arc<dyn OperationRecorder> {
    if enabled {
        Arc::new(AtomicOperationStats::new())
    } else {
        Arc::new(DisabledOperationRecorder)
    }
}
