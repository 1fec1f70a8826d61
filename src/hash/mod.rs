//! 哈希模块 - 键哈希策略与槽位定位

pub mod strategy;

pub use strategy::{HashAlgorithm, HashStrategy, IdentityHasher, KeyHasher};

/// 哈希值对应的起始槽位，`capacity` 必须是2的幂
#[inline]
pub fn home_slot(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (hash as usize) & (capacity - 1)
}

/// 线性探测的下一个槽位（回绕）
#[inline]
pub fn next_slot(index: usize, capacity: usize) -> usize {
    (index + 1) & (capacity - 1)
}

/// 容纳 `required` 个条目且负载因子不超过1/2的最小容量
///
/// 即严格大于 `2 * required - 1` 的最小2的幂；溢出时返回 `None`。
pub fn grown_capacity(required: usize) -> Option<usize> {
    required.checked_mul(2)?.checked_next_power_of_two()
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_masking() {
        assert_eq!(home_slot(1, 4), 1);
        assert_eq!(home_slot(5, 4), 1);
        assert_eq!(home_slot(u64::MAX, 8), 7);
        assert_eq!(next_slot(3, 4), 0);
        assert_eq!(next_slot(2, 4), 3);
    }

    #[test]
    fn test_grown_capacity() {
        assert_eq!(grown_capacity(1), Some(2));
        assert_eq!(grown_capacity(2), Some(4));
        assert_eq!(grown_capacity(3), Some(8));
        assert_eq!(grown_capacity(4), Some(8));
        assert_eq!(grown_capacity(5), Some(16));
        assert_eq!(grown_capacity(usize::MAX), None);
        assert_eq!(grown_capacity(usize::MAX / 2 + 1), None);
    }
}
