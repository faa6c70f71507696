//! Basic benchmarks for the `spawn_pool` package.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use spawn_pool::{Pool, RawPool};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn counter() -> impl FnMut() -> u64 + Send + 'static {
    let mut next = 0;
    move || {
        next += 1;
        next
    }
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("sp_raw");

    group.bench_function("spawn_despawn_warm", |b| {
        let mut pool = RawPool::new(counter());
        pool.create(1);

        b.iter(|| {
            let object = pool.spawn();
            pool.despawn(black_box(object)).unwrap();
        });
    });

    group.bench_function("spawn_cold_ten_thousand", |b| {
        b.iter(|| {
            let mut pool = RawPool::new(counter());
            for object in pool.spawn_many(10_000) {
                black_box(object);
            }
            pool
        });
    });

    group.bench_function("despawn_all_thousand", |b| {
        let mut pool = RawPool::new(counter());
        pool.create(1_000);

        b.iter(|| {
            for object in pool.spawn_many(1_000) {
                black_box(object);
            }
            pool.despawn_all()
        });
    });

    group.finish();

    let mut shared_group = c.benchmark_group("sp_shared");

    shared_group.bench_function("spawn_despawn_warm", |b| {
        let pool = Pool::new(counter());
        pool.create(1);

        b.iter(|| {
            let object = pool.spawn();
            pool.despawn(black_box(object)).unwrap();
        });
    });

    shared_group.finish();
}
