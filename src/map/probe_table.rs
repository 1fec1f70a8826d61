//! 开放寻址探测表核心实现
//!
//! 容量恒为2的幂（初始为0），线性探测，删除留下墓碑，负载因子上限1/2。
//! 哈希值与相等比较由调用方在每次调用时提供；插入前调用方负责 [`ProbeTable::reserve`]。

use crate::{
    error::ProbeError,
    hash::{grown_capacity, home_slot, next_slot},
    memory::SlotStorage,
    stats::{self, OperationRecorder, OperationStatsSnapshot},
    types::{OperationType, SlotState},
};
use std::{fmt, sync::Arc};

/// 探测表统计信息
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProbeTableStats {
    pub capacity: usize,
    pub count: usize,
    pub tombstones: usize,
    pub load_factor: f32,
    pub memory_usage: usize,
}

/// 开放寻址哈希表
///
/// `get` 返回的引用借用整张表，在下一次 `insert`/`remove`/`reserve` 之前有效；
/// 插入可能复用墓碑槽位，扩容会搬移所有条目，这一约束由借用检查保证。
pub struct ProbeTable<K, V> {
    storage: SlotStorage<K, V>,
    count: usize,
    tombstones: usize,
    recorder: Arc<dyn OperationRecorder>,
}

impl<K, V> ProbeTable<K, V> {
    /// 创建零容量的空表，不分配槽位
    pub fn new() -> Self {
        Self::with_recorder(stats::recorder(true))
    }

    /// 使用指定统计记录器创建空表
    pub fn with_recorder(recorder: Arc<dyn OperationRecorder>) -> Self {
        Self {
            storage: SlotStorage::empty(),
            count: 0,
            tombstones: 0,
            recorder,
        }
    }

    /// 槽位数量（0或2的幂）
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// 有效条目数
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// 墓碑槽位数
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    pub fn load_factor(&self) -> f32 {
        if self.capacity() == 0 {
            0.0
        } else {
            self.count as f32 / self.capacity() as f32
        }
    }

    /// 指定槽位的状态，越界返回 `None`
    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        (index < self.capacity()).then(|| self.storage.state(index))
    }

    /// 确保还能再插入 `extra` 个条目而无需扩容
    ///
    /// 当 `count + extra > capacity / 2` 时扩容到严格大于 `2 * (count + extra) - 1`
    /// 的最小2的幂，并用 `hash_fn` 重新计算每个有效条目的哈希；墓碑被丢弃。
    /// 容量已足够时什么也不做，不会移动任何条目。分配失败时表保持原样。
    pub fn reserve<F>(&mut self, extra: usize, hash_fn: F) -> Result<(), ProbeError>
    where
        F: FnMut(&K) -> u64,
    {
        let result = self.grow_for(extra, hash_fn);
        self.recorder.record(OperationType::Reserve, 0, result.is_ok());
        result
    }

    fn grow_for<F>(&mut self, extra: usize, hash_fn: F) -> Result<(), ProbeError>
    where
        F: FnMut(&K) -> u64,
    {
        let required = self
            .count
            .checked_add(extra)
            .ok_or(ProbeError::CapacityOverflow { requested: extra })?;
        if required <= self.capacity() / 2 {
            return Ok(());
        }

        let new_capacity = grown_capacity(required)
            .ok_or(ProbeError::CapacityOverflow { requested: required })?;
        self.rehash(new_capacity, hash_fn)
    }

    /// 整表重哈希到 `new_capacity`
    ///
    /// 新存储与全部哈希值都在移动任何条目之前得到；分配失败或 `hash_fn`
    /// panic 时旧表原样保留。
    fn rehash<F>(&mut self, new_capacity: usize, mut hash_fn: F) -> Result<(), ProbeError>
    where
        F: FnMut(&K) -> u64,
    {
        let old_capacity = self.capacity();
        let mut fresh = SlotStorage::try_with_capacity(new_capacity).map_err(|err| {
            log_error!(
                "rehash allocation failed: capacity {} -> {}: {}",
                old_capacity,
                new_capacity,
                err
            );
            err
        })?;

        let mut hashes: Vec<u64> = Vec::new();
        hashes
            .try_reserve_exact(self.count)
            .map_err(|_| ProbeError::AllocationFailed {
                size: self.count.saturating_mul(std::mem::size_of::<u64>()),
                align: std::mem::align_of::<u64>(),
            })?;
        for index in 0..old_capacity {
            if let Some(key) = self.storage.key(index) {
                hashes.push(hash_fn(key));
            }
        }

        // 以下不再调用外部代码；drain 与上面的遍历同为槽位下标递增顺序
        let dropped_tombstones = self.tombstones;
        let mut moved = 0usize;
        for ((key, value), hash) in self.storage.drain_occupied().zip(hashes) {
            // 新容量至少为条目数的两倍，空槽位必然存在
            if let Some((index, _)) = vacant_slot(&fresh, hash) {
                fresh.write(index, key, value);
                moved += 1;
            }
        }

        self.storage = fresh;
        self.count = moved;
        self.tombstones = 0;
        debug_assert_eq!(self.storage.count(SlotState::Occupied), moved);
        debug_assert_eq!(self.storage.count(SlotState::Tombstone), 0);
        self.recorder.record(OperationType::Rehash, moved as u64, true);

        log_debug!(
            "rehash: capacity {} -> {}, moved {} entries, dropped {} tombstones",
            old_capacity,
            new_capacity,
            moved,
            dropped_tombstones
        );
        Ok(())
    }

    /// 查找与 `key` 相等的条目
    ///
    /// 从 `hash` 的起始槽位线性探测：遇到相等的占用槽位返回其值，
    /// 遇到空槽位即判定不存在，占用但不相等或墓碑则继续。
    pub fn get<Q, F>(&self, key: &Q, hash: u64, equal_fn: F) -> Option<&V>
    where
        Q: ?Sized,
        F: FnMut(&K, &Q) -> bool,
    {
        let index = self.find(OperationType::Get, key, hash, equal_fn)?;
        self.storage.value(index)
    }

    /// 查找与 `key` 相等的条目并返回可变引用
    ///
    /// 调用方可以借此就地覆盖已有值，实现“先查后写”的更新语义。
    pub fn get_mut<Q, F>(&mut self, key: &Q, hash: u64, equal_fn: F) -> Option<&mut V>
    where
        Q: ?Sized,
        F: FnMut(&K, &Q) -> bool,
    {
        let index = self.find(OperationType::Get, key, hash, equal_fn)?;
        self.storage.value_mut(index)
    }

    /// 插入键值对
    ///
    /// 写入探测链上第一个空槽位或墓碑，不检查是否已存在相等的键：
    /// 重复插入会产生第二个条目，之后的查找返回先插入的那个。
    /// 调用方必须先 [`reserve`](Self::reserve)；表中没有可写槽位时返回
    /// [`ProbeError::CapacityExhausted`]。
    pub fn insert(&mut self, key: K, hash: u64, value: V) -> Result<(), ProbeError> {
        let capacity = self.capacity();
        let slot = if self.count < capacity {
            vacant_slot(&self.storage, hash)
        } else {
            None
        };

        let Some((index, steps)) = slot else {
            self.recorder.record(OperationType::Insert, 0, false);
            log_error!(
                "insert without reserve: capacity {}, count {}",
                capacity,
                self.count
            );
            return Err(ProbeError::CapacityExhausted {
                capacity,
                count: self.count,
            });
        };

        if self.storage.state(index).is_tombstone() {
            self.tombstones -= 1;
        }
        self.storage.write(index, key, value);
        self.count += 1;
        self.recorder.record(OperationType::Insert, steps as u64, true);
        Ok(())
    }

    /// 删除与 `key` 相等的条目并返回其值
    ///
    /// 被删除的槽位变为墓碑，其他条目不移动。
    pub fn remove<Q, F>(&mut self, key: &Q, hash: u64, equal_fn: F) -> Option<V>
    where
        Q: ?Sized,
        F: FnMut(&K, &Q) -> bool,
    {
        let index = self.find(OperationType::Remove, key, hash, equal_fn)?;
        let (_, value) = self.storage.take(index)?;
        self.count -= 1;
        self.tombstones += 1;
        Some(value)
    }

    /// 显式销毁表并释放全部存储
    pub fn destroy(self) {
        log_debug!(
            "destroy: capacity {}, count {}",
            self.capacity(),
            self.count
        );
        drop(self);
    }

    /// 当前统计信息
    pub fn stats(&self) -> ProbeTableStats {
        ProbeTableStats {
            capacity: self.capacity(),
            count: self.count,
            tombstones: self.tombstones,
            load_factor: self.load_factor(),
            memory_usage: self.storage.memory_usage(),
        }
    }

    /// 操作统计快照
    pub fn operation_stats(&self) -> OperationStatsSnapshot {
        self.recorder.snapshot()
    }

    pub fn recorder(&self) -> &Arc<dyn OperationRecorder> {
        &self.recorder
    }

    /// 导出Prometheus格式指标（操作计数 + 表状态）
    pub fn export_prometheus(&self) -> String {
        let mut output = self.recorder.export_prometheus();
        let gauges = [
            ("capacity", "Number of slots", self.capacity()),
            ("count", "Number of live entries", self.count),
            ("tombstones", "Number of tombstoned slots", self.tombstones),
        ];
        for (name, help, value) in gauges {
            output.push_str(&format!("# HELP probe_table_{} {}\n", name, help));
            output.push_str(&format!("# TYPE probe_table_{} gauge\n", name));
            output.push_str(&format!("probe_table_{} {}\n", name, value));
        }
        output
    }

    /// 沿探测链查找相等条目的槽位
    ///
    /// 最多访问 `capacity` 个槽位：表中可能只剩占用槽位和墓碑而没有空槽位。
    fn find<Q, F>(&self, op: OperationType, key: &Q, hash: u64, mut equal_fn: F) -> Option<usize>
    where
        Q: ?Sized,
        F: FnMut(&K, &Q) -> bool,
    {
        let capacity = self.capacity();
        if capacity == 0 {
            self.recorder.record(op, 0, false);
            return None;
        }

        let mut index = home_slot(hash, capacity);
        for step in 1..=capacity {
            match self.storage.state(index) {
                SlotState::Empty => {
                    self.recorder.record(op, step as u64, false);
                    return None;
                }
                SlotState::Occupied => {
                    if self.storage.key(index).is_some_and(|k| equal_fn(k, key)) {
                        self.recorder.record(op, step as u64, true);
                        return Some(index);
                    }
                }
                SlotState::Tombstone => {}
            }
            index = next_slot(index, capacity);
        }

        self.recorder.record(op, capacity as u64, false);
        None
    }
}

/// 探测链上第一个空槽位或墓碑，以及访问的槽位数
fn vacant_slot<K, V>(storage: &SlotStorage<K, V>, hash: u64) -> Option<(usize, usize)> {
    let capacity = storage.capacity();
    if capacity == 0 {
        return None;
    }

    let mut index = home_slot(hash, capacity);
    for step in 1..=capacity {
        if storage.state(index).is_vacant() {
            return Some((index, step));
        }
        index = next_slot(index, capacity);
    }
    None
}

impl<K, V> Default for ProbeTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ProbeTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeTable")
            .field("capacity", &self.capacity())
            .field("count", &self.count)
            .field("tombstones", &self.tombstones)
            .field("load_factor", &self.load_factor())
            .finish()
    }
}
