// src/memory/storage.rs
//! 槽位存储 - 标志数组、键数组、值数组三组并行存储，整体分配、整体释放

use crate::{error::ProbeError, memory::flags::SlotFlags, types::SlotState};
use std::mem::{self, MaybeUninit};

/// 三组并行数组
///
/// 键值数组中只有 `Occupied` 槽位持有已初始化的数据；`Empty` 与 `Tombstone`
/// 槽位的内容未初始化，不会被读取也不会被析构。
pub struct SlotStorage<K, V> {
    flags: SlotFlags,
    keys: Box<[MaybeUninit<K>]>,
    values: Box<[MaybeUninit<V>]>,
}

impl<K, V> SlotStorage<K, V> {
    /// 零容量存储，不分配内存
    pub fn empty() -> Self {
        Self {
            flags: SlotFlags::default(),
            keys: Box::new([]),
            values: Box::new([]),
        }
    }

    /// 分配 `capacity` 个全空槽位
    pub fn try_with_capacity(capacity: usize) -> Result<Self, ProbeError> {
        Ok(Self {
            flags: SlotFlags::try_new(capacity)?,
            keys: try_alloc_uninit(capacity)?,
            values: try_alloc_uninit(capacity)?,
        })
    }

    /// 槽位数量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.flags.len()
    }

    #[inline]
    pub fn state(&self, index: usize) -> SlotState {
        self.flags.get(index)
    }

    /// 占用槽位的键
    #[inline]
    pub fn key(&self, index: usize) -> Option<&K> {
        if self.flags.get(index).is_occupied() {
            // SAFETY: Occupied 槽位的键已初始化
            Some(unsafe { self.keys[index].assume_init_ref() })
        } else {
            None
        }
    }

    /// 占用槽位的值
    #[inline]
    pub fn value(&self, index: usize) -> Option<&V> {
        if self.flags.get(index).is_occupied() {
            // SAFETY: Occupied 槽位的值已初始化
            Some(unsafe { self.values[index].assume_init_ref() })
        } else {
            None
        }
    }

    #[inline]
    pub fn value_mut(&mut self, index: usize) -> Option<&mut V> {
        if self.flags.get(index).is_occupied() {
            // SAFETY: Occupied 槽位的值已初始化
            Some(unsafe { self.values[index].assume_init_mut() })
        } else {
            None
        }
    }

    /// 向空槽位或墓碑写入键值并标记为占用
    ///
    /// 槽位必须不处于 `Occupied`，否则原有条目会被泄漏。
    pub fn write(&mut self, index: usize, key: K, value: V) {
        debug_assert!(self.flags.get(index).is_vacant(), "写入已占用槽位 {}", index);
        self.keys[index].write(key);
        self.values[index].write(value);
        self.flags.set(index, SlotState::Occupied);
    }

    /// 取出占用槽位的键值并将槽位标记为墓碑
    pub fn take(&mut self, index: usize) -> Option<(K, V)> {
        if !self.flags.get(index).is_occupied() {
            return None;
        }
        // 先改状态，之后该槽位不会再被读取或析构
        self.flags.set(index, SlotState::Tombstone);
        // SAFETY: 槽位刚才处于 Occupied，键值均已初始化，且只在此处移出一次
        let entry = unsafe {
            (
                self.keys[index].assume_init_read(),
                self.values[index].assume_init_read(),
            )
        };
        Some(entry)
    }

    /// 按槽位下标递增顺序移出全部占用条目
    ///
    /// 每个被移出的槽位立即置为 `Empty`；迭代器提前丢弃时剩余条目仍归本存储所有。
    pub fn drain_occupied(&mut self) -> Drain<'_, K, V> {
        Drain {
            storage: self,
            index: 0,
        }
    }

    /// 统计处于指定状态的槽位数
    pub fn count(&self, state: SlotState) -> usize {
        self.flags.count(state)
    }

    /// 三组数组占用的字节数
    pub fn memory_usage(&self) -> usize {
        self.flags.byte_len()
            + self.keys.len() * mem::size_of::<K>()
            + self.values.len() * mem::size_of::<V>()
    }
}

impl<K, V> Default for SlotStorage<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, V> Drop for SlotStorage<K, V> {
    fn drop(&mut self) {
        if self.flags.is_empty() || (!mem::needs_drop::<K>() && !mem::needs_drop::<V>()) {
            return;
        }
        for index in 0..self.capacity() {
            if self.flags.get(index).is_occupied() {
                // SAFETY: Occupied 槽位的键值已初始化，析构后存储即被释放
                unsafe {
                    self.keys[index].assume_init_drop();
                    self.values[index].assume_init_drop();
                }
            }
        }
    }
}

/// [`SlotStorage::drain_occupied`] 返回的迭代器
pub struct Drain<'a, K, V> {
    storage: &'a mut SlotStorage<K, V>,
    index: usize,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.storage.capacity() {
            let index = self.index;
            self.index += 1;
            if self.storage.flags.get(index).is_occupied() {
                self.storage.flags.set(index, SlotState::Empty);
                // SAFETY: 槽位刚才处于 Occupied，状态已清空，不会再次读取或析构
                let entry = unsafe {
                    (
                        self.storage.keys[index].assume_init_read(),
                        self.storage.values[index].assume_init_read(),
                    )
                };
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.storage.capacity() - self.index))
    }
}

/// 分配未初始化数组，失败时返回 `AllocationFailed` 而不是中止进程
fn try_alloc_uninit<T>(len: usize) -> Result<Box<[MaybeUninit<T>]>, ProbeError> {
    let mut buf: Vec<MaybeUninit<T>> = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ProbeError::AllocationFailed {
            size: len.saturating_mul(mem::size_of::<T>()),
            align: mem::align_of::<T>(),
        })?;
    buf.resize_with(len, MaybeUninit::uninit);
    Ok(buf.into_boxed_slice())
}
