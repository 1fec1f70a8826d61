//! 内存管理模块 - 槽位标志与并行键值存储

pub mod flags;
pub mod storage;

pub use flags::SlotFlags;
pub use storage::{Drain, SlotStorage};
