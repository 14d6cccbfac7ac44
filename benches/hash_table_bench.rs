use chained_hashmap::HashTable;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::collections::HashMap as StdHashMap;
use std::time::Duration;

type Brown<K, V> = hashbrown::HashMap<K, V>;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

// 10k random picks out of `n`, deterministic across runs.
fn sample_indices(n: usize) -> Vec<usize> {
    let mut s = 0x9e3779b97f4a7c15u64;
    (0..10_000)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            (s as usize) % n
        })
        .collect()
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    let mut g = c.benchmark_group("insert_fresh_100k");
    g.bench_function("chained", |b| {
        b.iter_batched(
            HashTable::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    g.bench_function("hashbrown", |b| {
        b.iter_batched(
            Brown::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    g.bench_function("std", |b| {
        b.iter_batched(
            StdHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    g.finish();
}

fn bench_insert_u64_100k(c: &mut Criterion) {
    // Integer keys hash to themselves under the default hasher.
    let mut g = c.benchmark_group("insert_u64_100k");
    g.bench_function("chained", |b| {
        b.iter(|| {
            let mut m = HashTable::new();
            for (i, x) in lcg(2).take(100_000).enumerate() {
                m.insert(x, i as u64);
            }
            black_box(m)
        })
    });
    g.bench_function("chained_presized", |b| {
        b.iter(|| {
            let mut m = HashTable::with_bucket_count(131_071);
            for (i, x) in lcg(2).take(100_000).enumerate() {
                m.insert(x, i as u64);
            }
            black_box(m)
        })
    });
    g.bench_function("hashbrown", |b| {
        b.iter(|| {
            let mut m = Brown::new();
            for (i, x) in lcg(2).take(100_000).enumerate() {
                m.insert(x, i as u64);
            }
            black_box(m)
        })
    });
    g.finish();
}

fn bench_find_hit_10k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(7).take(100_000).map(key).collect();
    let queries: Vec<&String> = sample_indices(keys.len())
        .into_iter()
        .map(|i| &keys[i])
        .collect();

    let mut g = c.benchmark_group("find_hit_10k_on_100k");
    let chained: HashTable<String, u64> = keys.iter().cloned().zip(0..).collect();
    g.bench_function("chained", |b| {
        b.iter(|| {
            for k in &queries {
                black_box(chained.get(*k));
            }
        })
    });
    let brown: Brown<String, u64> = keys.iter().cloned().zip(0..).collect();
    g.bench_function("hashbrown", |b| {
        b.iter(|| {
            for k in &queries {
                black_box(brown.get(*k));
            }
        })
    });
    let std_map: StdHashMap<String, u64> = keys.iter().cloned().zip(0..).collect();
    g.bench_function("std", |b| {
        b.iter(|| {
            for k in &queries {
                black_box(std_map.get(*k));
            }
        })
    });
    g.finish();
}

fn bench_find_miss_10k(c: &mut Criterion) {
    let mut g = c.benchmark_group("find_miss_10k_on_100k");
    let chained: HashTable<String, u64> = lcg(11).take(100_000).map(key).zip(0..).collect();
    g.bench_function("chained", |b| {
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap_or_default());
                black_box(chained.get(&k));
            }
        })
    });
    let brown: Brown<String, u64> = lcg(11).take(100_000).map(key).zip(0..).collect();
    g.bench_function("hashbrown", |b| {
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap_or_default());
                black_box(brown.get(&k));
            }
        })
    });
    g.finish();
}

fn bench_remove_random_10k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(5).take(110_000).map(key).collect();
    let targets: Vec<String> = sample_indices(keys.len())
        .into_iter()
        .map(|i| keys[i].clone())
        .collect();

    let mut g = c.benchmark_group("remove_random_10k_of_110k");
    g.bench_function("chained", |b| {
        b.iter_batched(
            || keys.iter().cloned().zip(0u64..).collect::<HashTable<_, _>>(),
            |mut m| {
                for k in &targets {
                    black_box(m.remove(k));
                }
                black_box(m)
            },
            BatchSize::LargeInput,
        )
    });
    g.bench_function("hashbrown", |b| {
        b.iter_batched(
            || keys.iter().cloned().zip(0u64..).collect::<Brown<_, _>>(),
            |mut m| {
                for k in &targets {
                    black_box(m.remove(k));
                }
                black_box(m)
            },
            BatchSize::LargeInput,
        )
    });
    g.finish();
}

fn bench_iter_all_100k(c: &mut Criterion) {
    let mut g = c.benchmark_group("iter_all_100k");
    let chained: HashTable<u64, u64> = lcg(999).take(100_000).zip(0..).collect();
    g.bench_function("chained", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in chained.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
    g.bench_function("chained_cursor", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            let mut cur = chained.begin();
            while let Ok(v) = cur.value(&chained) {
                sum = sum.wrapping_add(*v);
                cur = match cur.next(&chained) {
                    Ok(next) => next,
                    Err(_) => break,
                };
            }
            black_box(sum)
        })
    });
    let brown: Brown<u64, u64> = lcg(999).take(100_000).zip(0..).collect();
    g.bench_function("hashbrown", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in brown.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
    g.finish();
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_u64_100k
}

criterion_group! {
    name = benches_lookup;
    config = bench_config();
    targets = bench_find_hit_10k, bench_find_miss_10k, bench_remove_random_10k
}

criterion_group! {
    name = benches_iter;
    config = bench_config();
    targets = bench_iter_all_100k
}

criterion_main!(benches_insert, benches_lookup, benches_iter);
