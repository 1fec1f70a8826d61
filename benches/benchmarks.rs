//! 探测哈希表性能基准测试

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use probe_hashtable::{
    batch_insert, HashAlgorithm, HashStrategy, KeyHasher, ProbeMap, ProbeMapConfig, ProbeTable,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// 基准测试配置
const SEED: u64 = 42;
const ITEM_COUNTS: [usize; 3] = [10_000, 100_000, 1_000_000];

/// 生成随机键值对
fn generate_items(count: usize) -> Vec<(u64, u64)> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..count).map(|_| (rng.gen(), rng.gen())).collect()
}

fn config(initial_capacity: usize) -> ProbeMapConfig {
    ProbeMapConfig {
        initial_capacity,
        hash_algorithm: HashAlgorithm::AHash,
        record_stats: false,
        ..ProbeMapConfig::default()
    }
}

fn filled_map(items: &[(u64, u64)]) -> ProbeMap<u64, u64> {
    let mut map = ProbeMap::with_config(config(items.len())).unwrap();
    batch_insert(&mut map, items.iter().copied()).unwrap();
    map
}

/// 插入操作基准测试（预留后插入）
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert");

    for &count in ITEM_COUNTS.iter() {
        let items = generate_items(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter_batched(
                || ProbeMap::<u64, u64>::with_config(config(items.len())).unwrap(),
                |mut map| {
                    for &(key, value) in items {
                        map.insert(key, value).unwrap();
                    }
                    map
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

/// 逐条扩容插入基准测试
fn bench_grow(c: &mut Criterion) {
    let mut group = c.benchmark_group("Grow");
    let hasher = KeyHasher::new(HashAlgorithm::AHash, SEED);

    for &count in ITEM_COUNTS.iter() {
        let items = generate_items(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter(|| {
                let mut table: ProbeTable<u64, u64> = ProbeTable::new();
                for &(key, value) in items {
                    table.reserve(1, |k| hasher.hash_key(k)).unwrap();
                    table.insert(key, hasher.hash_key(&key), value).unwrap();
                }
                table
            });
        });
    }
    group.finish();
}

/// 查询操作基准测试
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("Get");

    for &count in ITEM_COUNTS.iter() {
        let items = generate_items(count);
        let map = filled_map(&items);
        let keys: Vec<u64> = items.iter().map(|&(k, _)| k).collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(map.get(key));
                }
            });
        });
    }
    group.finish();
}

/// 删除操作基准测试
fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("Remove");

    for &count in ITEM_COUNTS.iter() {
        let items = generate_items(count);
        let keys: Vec<u64> = items.iter().map(|&(k, _)| k).collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &keys, |b, keys| {
            b.iter_batched(
                || filled_map(&items),
                |mut map| {
                    for key in keys {
                        black_box(map.remove(key));
                    }
                    map
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_grow, bench_get, bench_remove);
criterion_main!(benches);
