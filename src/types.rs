//! 核心类型定义 - 槽位状态与操作类型

use std::fmt;

/// 槽位状态
///
/// 状态转换只有三条：`Empty -> Occupied`（插入），`Occupied -> Tombstone`（删除），
/// `Tombstone -> Occupied`（插入复用墓碑）。墓碑只在整表重哈希时被丢弃。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlotState {
    /// 从未写入，或重哈希后的新槽位
    #[default]
    Empty,
    /// 持有有效键值对
    Occupied,
    /// 已删除，探测链继续经过
    Tombstone,
}

impl SlotState {
    /// 存在位 (低位)
    pub const PRESENT_BIT: u8 = 0b01;

    /// 墓碑位 (高位)
    pub const TOMBSTONE_BIT: u8 = 0b10;

    /// 打包为2位编码
    pub const fn to_bits(self) -> u8 {
        match self {
            SlotState::Empty => 0,
            SlotState::Occupied => Self::PRESENT_BIT,
            SlotState::Tombstone => Self::TOMBSTONE_BIT,
        }
    }

    /// 从2位编码解包
    ///
    /// 存在位优先，两位同时置位不会由本库写出。
    pub const fn from_bits(bits: u8) -> Self {
        if bits & Self::PRESENT_BIT != 0 {
            SlotState::Occupied
        } else if bits & Self::TOMBSTONE_BIT != 0 {
            SlotState::Tombstone
        } else {
            SlotState::Empty
        }
    }

    /// 检查是否为空槽位
    pub const fn is_empty(self) -> bool {
        matches!(self, SlotState::Empty)
    }

    /// 检查是否被占用
    pub const fn is_occupied(self) -> bool {
        matches!(self, SlotState::Occupied)
    }

    /// 检查是否为墓碑
    pub const fn is_tombstone(self) -> bool {
        matches!(self, SlotState::Tombstone)
    }

    /// 插入时可写入（空槽位或墓碑）
    pub const fn is_vacant(self) -> bool {
        !self.is_occupied()
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotState::Empty => write!(f, "Empty"),
            SlotState::Occupied => write!(f, "Occupied"),
            SlotState::Tombstone => write!(f, "Tombstone"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// 预留容量
    Reserve,
    /// 重哈希扩容
    Rehash,
    /// 获取操作
    Get,
    /// 插入操作
    Insert,
    /// 删除操作
    Remove,
}

impl OperationType {
    /// 全部操作类型
    pub const ALL: [OperationType; 5] = [
        OperationType::Reserve,
        OperationType::Rehash,
        OperationType::Get,
        OperationType::Insert,
        OperationType::Remove,
    ];

    /// 转换为字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Reserve => "reserve",
            OperationType::Rehash => "rehash",
            OperationType::Get => "get",
            OperationType::Insert => "insert",
            OperationType::Remove => "remove",
        }
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_state_bits() {
        for state in [SlotState::Empty, SlotState::Occupied, SlotState::Tombstone] {
            assert_eq!(SlotState::from_bits(state.to_bits()), state);
        }
        assert_eq!(SlotState::Occupied.to_bits(), 0b01);
        assert_eq!(SlotState::Tombstone.to_bits(), 0b10);
    }

    #[test]
    fn test_vacant_states() {
        assert!(SlotState::Empty.is_vacant());
        assert!(SlotState::Tombstone.is_vacant());
        assert!(!SlotState::Occupied.is_vacant());
        assert_eq!(SlotState::default(), SlotState::Empty);
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(OperationType::Rehash.as_str(), "rehash");
        assert_eq!(OperationType::ALL.len(), 5);
    }
}
