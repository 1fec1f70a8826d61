// src/stats/operation.rs
//! 操作统计 - 跟踪探测表操作次数与探测长度

use crate::types::OperationType;
use std::{
    fmt::Write,
    sync::atomic::{AtomicU64, Ordering},
};

/// 操作统计接口
pub trait OperationRecorder: Send + Sync {
    /// 记录一次操作
    ///
    /// `steps` 对查找类操作是访问的槽位数，对重哈希是搬移的条目数。
    fn record(&self, op_type: OperationType, steps: u64, success: bool);

    /// 获取操作统计快照
    fn snapshot(&self) -> OperationStatsSnapshot;

    /// 重置统计
    fn reset(&self);

    /// 导出Prometheus格式指标
    fn export_prometheus(&self) -> String;
}

/// 操作统计快照
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationStatsSnapshot {
    pub reserve_count: u64,
    pub rehash_count: u64,
    pub get_count: u64,
    pub insert_count: u64,
    pub remove_count: u64,
    /// 查找/插入/删除访问的槽位总数
    pub probe_steps: u64,
    /// 重哈希搬移的条目总数
    pub rehashed_entries: u64,
    /// 未找到或失败的次数
    pub miss_count: u64,
}

impl OperationStatsSnapshot {
    /// 指定操作的次数
    pub fn count(&self, op_type: OperationType) -> u64 {
        match op_type {
            OperationType::Reserve => self.reserve_count,
            OperationType::Rehash => self.rehash_count,
            OperationType::Get => self.get_count,
            OperationType::Insert => self.insert_count,
            OperationType::Remove => self.remove_count,
        }
    }

    /// 平均探测长度
    pub fn average_probe_length(&self) -> f64 {
        let lookups = self.get_count + self.insert_count + self.remove_count;
        if lookups == 0 {
            0.0
        } else {
            self.probe_steps as f64 / lookups as f64
        }
    }
}

/// 原子操作统计
#[derive(Debug, Default)]
pub struct AtomicOperationStats {
    reserve_count: AtomicU64,
    rehash_count: AtomicU64,
    get_count: AtomicU64,
    insert_count: AtomicU64,
    remove_count: AtomicU64,
    probe_steps: AtomicU64,
    rehashed_entries: AtomicU64,
    miss_count: AtomicU64,
}

impl AtomicOperationStats {
    /// 创建新统计
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, op_type: OperationType) -> &AtomicU64 {
        match op_type {
            OperationType::Reserve => &self.reserve_count,
            OperationType::Rehash => &self.rehash_count,
            OperationType::Get => &self.get_count,
            OperationType::Insert => &self.insert_count,
            OperationType::Remove => &self.remove_count,
        }
    }
}

impl OperationRecorder for AtomicOperationStats {
    fn record(&self, op_type: OperationType, steps: u64, success: bool) {
        self.counter(op_type).fetch_add(1, Ordering::Relaxed);

        match op_type {
            OperationType::Rehash => {
                self.rehashed_entries.fetch_add(steps, Ordering::Relaxed);
            }
            OperationType::Reserve => {}
            _ => {
                self.probe_steps.fetch_add(steps, Ordering::Relaxed);
            }
        }

        if !success {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot {
            reserve_count: self.reserve_count.load(Ordering::Relaxed),
            rehash_count: self.rehash_count.load(Ordering::Relaxed),
            get_count: self.get_count.load(Ordering::Relaxed),
            insert_count: self.insert_count.load(Ordering::Relaxed),
            remove_count: self.remove_count.load(Ordering::Relaxed),
            probe_steps: self.probe_steps.load(Ordering::Relaxed),
            rehashed_entries: self.rehashed_entries.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        for op in OperationType::ALL {
            self.counter(op).store(0, Ordering::Relaxed);
        }
        self.probe_steps.store(0, Ordering::Relaxed);
        self.rehashed_entries.store(0, Ordering::Relaxed);
        self.miss_count.store(0, Ordering::Relaxed);
    }

    fn export_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        let mut output = String::new();

        for op in OperationType::ALL {
            let _ = writeln!(
                output,
                "# HELP probe_operation_{}_count Total {} operations",
                op.as_str(),
                op.as_str()
            );
            let _ = writeln!(output, "# TYPE probe_operation_{}_count counter", op.as_str());
            let _ = writeln!(
                output,
                "probe_operation_{}_count {}",
                op.as_str(),
                snapshot.count(op)
            );
        }

        output.push_str("# HELP probe_probe_steps_total Total slots visited by lookups\n");
        output.push_str("# TYPE probe_probe_steps_total counter\n");
        let _ = writeln!(output, "probe_probe_steps_total {}", snapshot.probe_steps);

        output.push_str("# HELP probe_rehashed_entries_total Total entries moved by rehash\n");
        output.push_str("# TYPE probe_rehashed_entries_total counter\n");
        let _ = writeln!(output, "probe_rehashed_entries_total {}", snapshot.rehashed_entries);

        output.push_str("# HELP probe_miss_count Total lookups that found nothing\n");
        output.push_str("# TYPE probe_miss_count counter\n");
        let _ = writeln!(output, "probe_miss_count {}", snapshot.miss_count);

        output
    }
}

/// 禁用操作统计实现
#[derive(Debug, Default)]
pub struct DisabledOperationRecorder;

impl OperationRecorder for DisabledOperationRecorder {
    fn record(&self, _op_type: OperationType, _steps: u64, _success: bool) {}
    fn snapshot(&self) -> OperationStatsSnapshot { OperationStatsSnapshot::default() }
    fn reset(&self) {}
    fn export_prometheus(&self) -> String { String::new() }
}
