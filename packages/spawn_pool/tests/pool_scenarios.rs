//! End-to-end scenarios exercising pools through the public API only.

use std::sync::{Arc, Mutex};

use spawn_pool::{
    DEFAULT_POOL_NAME, Error, IntoPoolObject, Pool, PoolEvent, PoolObject, PoolRegistry, RawPool,
};

fn counter() -> impl FnMut() -> u32 + Send + 'static {
    let mut next = 0;
    move || {
        let value = next;
        next += 1;
        value
    }
}

#[test]
fn counting_factory_round_trip() {
    let mut pool = RawPool::new(counter());

    pool.create(3);
    assert_eq!(pool.total(), 3);
    assert_eq!(pool.available(), 3);

    let first = pool.spawn();
    let second = pool.spawn();
    let third = pool.spawn();
    assert_eq!(
        [*first.value(), *second.value(), *third.value()],
        [2, 1, 0]
    );
    assert_eq!(pool.available(), 0);

    pool.despawn(first.clone()).unwrap();
    assert_eq!(pool.available(), 1);

    let reused = pool.spawn();
    assert!(PoolObject::ptr_eq(&first, &reused));
}

#[test]
fn available_never_exceeds_total() {
    let mut pool = RawPool::new(counter());
    let mut spawned = Vec::new();

    for round in 0..20_u32 {
        if round % 3 == 0 {
            pool.despawn_all();
            spawned.clear();
        } else if round % 2 == 0 {
            spawned.extend(pool.spawn_many(2));
        } else if let Some(object) = spawned.pop() {
            pool.despawn(object).unwrap();
        } else {
            pool.add(1000 + round);
        }

        assert!(pool.available() <= pool.total());
    }
}

#[test]
fn event_sequence_covers_full_lifecycle() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let pool = Pool::new(counter());

    for event in [
        PoolEvent::ObjectAdded,
        PoolEvent::Spawned,
        PoolEvent::Despawned,
    ] {
        let events = Arc::clone(&events);
        pool.subscribe(event, move |object| {
            events.lock().unwrap().push((event, *object.value()));
        });
    }

    let object = pool.spawn();
    pool.despawn(object).unwrap();
    pool.despawn(50_u32.into_pool_object()).unwrap();
    assert!(pool.add(60));
    assert!(!pool.add(60));

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            (PoolEvent::ObjectAdded, 0),
            (PoolEvent::Spawned, 0),
            (PoolEvent::Despawned, 0),
            (PoolEvent::ObjectAdded, 50),
            (PoolEvent::Despawned, 50),
            (PoolEvent::ObjectAdded, 60),
        ]
    );
}

#[test]
fn registry_hands_out_same_pool_by_name() {
    let registry = PoolRegistry::new();

    let first = registry.get_or_create_pool::<u32>("fx");
    let second = registry.get_or_create_pool::<u32>("fx");
    assert!(Pool::ptr_eq(&first, &second));

    let object = first.spawn();
    assert!(second.contains(&object));
}

#[test]
fn registry_default_pool_and_despawn_into() {
    let registry = PoolRegistry::default();

    let object = registry
        .get_or_create_pool::<String>(DEFAULT_POOL_NAME)
        .spawn();
    registry
        .despawn_into(DEFAULT_POOL_NAME, object.clone())
        .unwrap();

    let result = registry.despawn_into(DEFAULT_POOL_NAME, object);
    assert!(matches!(result, Err(Error::AlreadyAvailable)));
    assert_eq!(registry.pool_names::<String>(), vec![String::new()]);
}
