//! 统一错误处理 - 探测表可能出现的错误类型

/// 探测表可能发生的错误
///
/// 查找失败不是错误：`get`/`remove` 用 `None` 表示未找到。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("表已满，插入前未预留容量 (容量: {capacity}, 当前条目数: {count})")]
    CapacityExhausted {
        capacity: usize,
        count: usize,
    },

    #[error("内存分配失败 (大小: {size}, 对齐: {align})")]
    AllocationFailed {
        size: usize,
        align: usize,
    },

    #[error("请求的容量溢出 (请求条目数: {requested})")]
    CapacityOverflow {
        requested: usize,
    },
}

impl ProbeError {
    /// 获取错误恢复建议
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::CapacityExhausted { .. } => Some("插入前调用 reserve 预留足够容量"),
            Self::AllocationFailed { .. } => Some("检查系统内存或减小预留数量"),
            Self::CapacityOverflow { .. } => Some("减小预留数量"),
        }
    }

    /// 判断错误是否可恢复
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AllocationFailed { .. })
    }

    /// 是否为调用方违反使用约定
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::CapacityExhausted { .. })
    }
}
