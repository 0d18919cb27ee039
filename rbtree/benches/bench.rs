use core::hint::black_box;
use core::time::Duration;
use std::collections::BTreeMap;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rbtree::RbMap;

macro_rules! bench_insert {
    ($g:expr, $name:expr, $count:expr, $keys:expr, $($map:tt)*) => {
        $g.bench_with_input(BenchmarkId::new($name, $count), &$count, |b, _i| {
            b.iter(|| {
                let mut map = $($map)*::new();
                for x in $keys.iter().copied() {
                    map.insert(x, x);
                }
                map
            })
        });
    };
}

fn insert(c: &mut Criterion) {
    let mut g = c.benchmark_group("insert");

    let mut count = 1000;
    for _ in 0..20 {
        let keys = gen_unique_keys_int(count, i32::MAX / 2);
        bench_insert!(g, "std_btree", count, keys, BTreeMap);
        bench_insert!(g, "rbtree", count, keys, RbMap);
        count = (count as f64 * 1.2) as usize;
    }
}

macro_rules! bench_get {
    ($g:expr, $name:expr, $count:expr, $keys:expr, $access_keys:expr, $($map:tt)*) => {
        let mut map = $($map)*::new();
        for x in $keys.iter().copied() {
            map.insert(x, x);
        }

        $g.bench_with_input(BenchmarkId::new($name, $count), &$count, |b, _c| {
            b.iter(|| {
                for k in $access_keys.iter() {
                    black_box(map.get(black_box(k)));
                }
            })
        });
    };
}

fn get(c: &mut Criterion) {
    let mut g = c.benchmark_group("get");
    g.sampling_mode(criterion::SamplingMode::Flat);

    let mut count = 1000;
    for _ in 0..20 {
        let keys = gen_unique_keys_int(count, i32::MAX / 2);
        let access_keys = shuffled(&keys, 321);

        bench_get!(g, "std_btree", count, keys, access_keys, BTreeMap);
        bench_get!(g, "rbtree", count, keys, access_keys, RbMap);
        count = (count as f64 * 1.2) as usize;
    }
}

fn remove(c: &mut Criterion) {
    let mut g = c.benchmark_group("remove");

    let mut count = 1000;
    for _ in 0..20 {
        let keys = gen_unique_keys_int(count, i32::MAX / 2);
        let remove_keys = shuffled(&keys, 654);

        g.bench_with_input(BenchmarkId::new("std_btree", count), &count, |b, _c| {
            b.iter_batched(
                || keys.iter().map(|x| (*x, *x)).collect::<BTreeMap<_, _>>(),
                |mut map| {
                    for k in remove_keys.iter() {
                        black_box(map.remove_entry(k));
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            )
        });
        g.bench_with_input(BenchmarkId::new("rbtree", count), &count, |b, _c| {
            b.iter_batched(
                || keys.iter().map(|x| (*x, *x)).collect::<RbMap<_, _>>(),
                |mut map| {
                    for k in remove_keys.iter() {
                        black_box(map.delete(k));
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            )
        });
        count = (count as f64 * 1.2) as usize;
    }
}

pub fn gen_unique_keys_int(count: usize, key_max: i32) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(123);
    let unique_keys = rand::seq::index::sample(&mut rng, key_max as usize, count);
    let keys: Vec<i32> = unique_keys.into_iter().map(|a| a as i32).collect();
    assert_eq!(keys.len(), count);
    keys
}

pub fn shuffled(keys: &[i32], seed: u64) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut keys = keys.to_vec();
    keys.shuffle(&mut rng);
    keys
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_millis(1000))
        ;
    targets = get, insert, remove
);
criterion_main!(benches);
