//! Thread safety integration tests for `spawn_pool`.
//!
//! These tests verify that shared pools and the registry behave consistently when used from
//! multiple threads at once.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use spawn_pool::{Pool, PoolEvent, PoolRegistry};

const THREADS: usize = 8;
const ROUNDS: usize = 200;

fn unique_factory() -> impl FnMut() -> u64 + Send + 'static {
    let next = Arc::new(AtomicU64::new(0));
    move || next.fetch_add(1, Ordering::Relaxed)
}

#[test]
fn concurrent_spawn_never_hands_out_same_instance_twice() {
    let pool = Pool::new(unique_factory());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let pool = pool.clone();
            thread::spawn(move || {
                (0..ROUNDS)
                    .map(|_| *pool.spawn().value())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for value in handle.join().unwrap() {
            assert!(seen.insert(value), "instance {value} was spawned twice");
        }
    }

    assert_eq!(pool.total(), THREADS * ROUNDS);
    assert_eq!(pool.available(), 0);
}

#[test]
fn concurrent_spawn_and_despawn_keeps_counts_consistent() {
    let pool = Pool::new(unique_factory());
    let despawns = Arc::new(AtomicU64::new(0));

    pool.subscribe(PoolEvent::Despawned, {
        let despawns = Arc::clone(&despawns);
        move |_| {
            despawns.fetch_add(1, Ordering::Relaxed);
        }
    });

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let pool = pool.clone();
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    let object = pool.spawn();
                    pool.despawn(object).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(pool.available(), pool.total());
    assert!(pool.total() <= THREADS);
    assert_eq!(
        despawns.load(Ordering::Relaxed),
        u64::try_from(THREADS * ROUNDS).unwrap()
    );
}

#[test]
fn concurrent_registry_lookups_agree_on_one_pool() {
    let registry = Arc::new(PoolRegistry::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.get_or_create_pool::<u32>("fx"))
        })
        .collect();

    let pools: Vec<Pool<u32>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    for pool in &pools {
        assert!(Pool::ptr_eq(pool, &pools[0]));
    }
    assert_eq!(registry.pool_names::<u32>(), vec!["fx".to_string()]);
}

#[test]
fn concurrent_spawn_from_constant_factory_completes() {
    let pool = Pool::new(|| 7_u64);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let pool = pool.clone();
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    let object = pool.spawn();
                    assert_eq!(*object.value(), 7);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(pool.total(), 1);
}
