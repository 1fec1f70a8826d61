//! 哈希策略模块 - 为键计算64位哈希值

use ahash::RandomState;
use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{BuildHasher, Hash, Hasher},
};

/// 哈希算法选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    AHash,
    XxHash,
    Default,
}

/// 哈希策略特征
///
/// 同一个键在一次重哈希过程中必须得到相同的哈希值。
pub trait HashStrategy<K: ?Sized> {
    /// 计算键的哈希值
    fn hash_key(&self, key: &K) -> u64;
}

impl<K: ?Sized, F> HashStrategy<K> for F
where
    F: Fn(&K) -> u64,
{
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

#[derive(Clone)]
enum HasherKind {
    AHash(RandomState),
    XxHash(u64),
    Default,
}

/// 基于 [`Hash`] 的通用哈希策略
#[derive(Clone)]
pub struct KeyHasher {
    kind: HasherKind,
    algorithm: HashAlgorithm,
    seed: u64,
}

impl KeyHasher {
    /// 使用指定算法和种子创建
    pub fn new(algorithm: HashAlgorithm, seed: u64) -> Self {
        let kind = match algorithm {
            HashAlgorithm::AHash => HasherKind::AHash(RandomState::with_seed(seed as usize)),
            HashAlgorithm::XxHash => HasherKind::XxHash(seed),
            HashAlgorithm::Default => HasherKind::Default,
        };

        Self {
            kind,
            algorithm,
            seed,
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for KeyHasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::AHash, 42)
    }
}

impl fmt::Debug for KeyHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyHasher")
            .field("algorithm", &self.algorithm)
            .field("seed", &self.seed)
            .finish()
    }
}

impl<K: Hash + ?Sized> HashStrategy<K> for KeyHasher {
    fn hash_key(&self, key: &K) -> u64 {
        match &self.kind {
            HasherKind::AHash(state) => state.hash_one(key),
            HasherKind::XxHash(seed) => {
                let mut hasher = twox_hash::XxHash64::with_seed(*seed);
                key.hash(&mut hasher);
                hasher.finish()
            }
            HasherKind::Default => {
                let mut hasher = DefaultHasher::new();
                key.hash(&mut hasher);
                hasher.finish()
            }
        }
    }
}

/// 整数键的恒等哈希，哈希值即键值本身（有符号数按符号扩展）
///
/// 主要用于构造可预测的冲突场景。
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHasher;

macro_rules! impl_identity_hash {
    ($($t:ty),* $(,)?) => {
        $(
            impl HashStrategy<$t> for IdentityHasher {
                #[inline]
                fn hash_key(&self, key: &$t) -> u64 {
                    *key as u64
                }
            }
        )*
    };
}

impl_identity_hash!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
