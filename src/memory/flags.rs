// src/memory/flags.rs
//! 槽位标志数组 - 每个槽位2位（存在位 + 墓碑位），按字节紧凑存放

use crate::{error::ProbeError, types::SlotState};

const BITS_PER_SLOT: usize = 2;
const SLOTS_PER_BYTE: usize = u8::BITS as usize / BITS_PER_SLOT;

/// 紧凑的槽位状态数组
///
/// 槽位 `i` 占据位 `2i`（存在）和 `2i + 1`（墓碑）。新分配的数组全部为 `Empty`。
#[derive(Debug, Default)]
pub struct SlotFlags {
    bytes: Box<[u8]>,
    slots: usize,
}

impl SlotFlags {
    /// 分配 `slots` 个全空槽位的标志数组
    pub fn try_new(slots: usize) -> Result<Self, ProbeError> {
        let len = Self::bytes_for(slots);
        let mut bytes: Vec<u8> = Vec::new();
        bytes.try_reserve_exact(len).map_err(|_| ProbeError::AllocationFailed {
            size: len,
            align: 1,
        })?;
        bytes.resize(len, 0);

        Ok(Self {
            bytes: bytes.into_boxed_slice(),
            slots,
        })
    }

    /// 容纳 `slots` 个槽位所需字节数
    pub const fn bytes_for(slots: usize) -> usize {
        slots.div_ceil(SLOTS_PER_BYTE)
    }

    /// 槽位数量
    pub fn len(&self) -> usize {
        self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots == 0
    }

    /// 占用的字节数
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// 读取槽位状态
    #[inline]
    pub fn get(&self, index: usize) -> SlotState {
        debug_assert!(index < self.slots);
        let (byte, shift) = Self::locate(index);
        SlotState::from_bits((self.bytes[byte] >> shift) & 0b11)
    }

    /// 写入槽位状态，同时覆盖存在位与墓碑位
    #[inline]
    pub fn set(&mut self, index: usize, state: SlotState) {
        debug_assert!(index < self.slots);
        let (byte, shift) = Self::locate(index);
        let cell = &mut self.bytes[byte];
        *cell = (*cell & !(0b11 << shift)) | (state.to_bits() << shift);
    }

    /// 统计处于指定状态的槽位数
    pub fn count(&self, state: SlotState) -> usize {
        (0..self.slots).filter(|&i| self.get(i) == state).count()
    }

    #[inline]
    fn locate(index: usize) -> (usize, u32) {
        let bit = index * BITS_PER_SLOT;
        (bit / u8::BITS as usize, (bit % u8::BITS as usize) as u32)
    }
}
