//! 绑定哈希策略的探测表封装

use crate::{
    error::ProbeError,
    hash::{HashAlgorithm, HashStrategy, KeyHasher},
    map::probe_table::{ProbeTable, ProbeTableStats},
    stats::{self, OperationStatsSnapshot},
};
use std::{fmt, hash::Hash};

/// 哈希表配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeMapConfig {
    /// 构造时预留的条目数（0表示不预分配）
    pub initial_capacity: usize,
    pub hash_algorithm: HashAlgorithm,
    pub seed: u64,
    /// 是否记录操作统计
    pub record_stats: bool,
}

impl Default for ProbeMapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            hash_algorithm: HashAlgorithm::AHash,
            seed: 42,
            record_stats: true,
        }
    }
}

/// 在构造时绑定哈希策略和 [`Eq`] 的探测表
///
/// 每次插入前自动预留一个条目的容量。`insert` 保留底层表的重复键语义，
/// 需要覆盖已有值时使用 [`upsert`](Self::upsert)。
pub struct ProbeMap<K, V, H = KeyHasher> {
    table: ProbeTable<K, V>,
    hasher: H,
}

impl<K: Hash + Eq, V> ProbeMap<K, V, KeyHasher> {
    /// 使用默认配置创建
    pub fn new() -> Self {
        Self::from_config(&crate::map::DEFAULT_CONFIG)
    }

    /// 使用指定配置创建，`initial_capacity` 非零时立即预留
    pub fn with_config(config: ProbeMapConfig) -> Result<Self, ProbeError> {
        let mut map = Self::from_config(&config);
        map.reserve(config.initial_capacity)?;
        log_debug!(
            "probe map created: algorithm {:?}, capacity {}",
            config.hash_algorithm,
            map.capacity()
        );
        Ok(map)
    }

    fn from_config(config: &ProbeMapConfig) -> Self {
        Self {
            table: ProbeTable::with_recorder(stats::recorder(config.record_stats)),
            hasher: KeyHasher::new(config.hash_algorithm, config.seed),
        }
    }
}

impl<K: Hash + Eq, V> Default for ProbeMap<K, V, KeyHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq, V, H: HashStrategy<K>> ProbeMap<K, V, H> {
    /// 使用自定义哈希策略创建
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            table: ProbeTable::new(),
            hasher,
        }
    }

    /// 确保还能再插入 `extra` 个条目而无需扩容
    pub fn reserve(&mut self, extra: usize) -> Result<(), ProbeError> {
        let hasher = &self.hasher;
        self.table.reserve(extra, |key| hasher.hash_key(key))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hasher.hash_key(key);
        self.table.get(key, hash, |a, b| a == b)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hasher.hash_key(key);
        self.table.get_mut(key, hash, |a, b| a == b)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// 插入键值对，不检查重复键
    pub fn insert(&mut self, key: K, value: V) -> Result<(), ProbeError> {
        self.reserve(1)?;
        let hash = self.hasher.hash_key(&key);
        self.table.insert(key, hash, value)
    }

    /// 已存在相等的键时覆盖其值并返回旧值，否则插入
    pub fn upsert(&mut self, key: K, value: V) -> Result<Option<V>, ProbeError> {
        if let Some(slot) = self.get_mut(&key) {
            return Ok(Some(std::mem::replace(slot, value)));
        }
        self.insert(key, value)?;
        Ok(None)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let hash = self.hasher.hash_key(key);
        self.table.remove(key, hash, |a, b| a == b)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// 底层探测表
    pub fn as_table(&self) -> &ProbeTable<K, V> {
        &self.table
    }

    pub fn into_table(self) -> ProbeTable<K, V> {
        self.table
    }

    pub fn stats(&self) -> ProbeTableStats {
        self.table.stats()
    }

    pub fn operation_stats(&self) -> OperationStatsSnapshot {
        self.table.operation_stats()
    }

    pub fn export_prometheus(&self) -> String {
        self.table.export_prometheus()
    }
}

impl<K, V, H> fmt::Debug for ProbeMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeMap").field("table", &self.table).finish()
    }
}
