#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A recycling object pool that hands out reusable instances of a type and takes them back,
//! notifying observers at every transition.
//!
//! Objects that are expensive to create or that are created and discarded at a high rate
//! (projectiles, particle effects, buffers, UI widgets) can be recycled through a pool instead of
//! being recreated every time. The pool remembers every instance it has ever seen and keeps the
//! instances that are currently unused on a LIFO stack, so the most recently returned instance is
//! the first to be handed out again.
//!
//! # Pool types
//!
//! - [`RawPool<T>`] is owned by a single caller and requires `&mut` access for every operation.
//! - [`Pool<T>`] is a cloneable handle to a shared pool, usable from multiple threads.
//! - [`PoolRegistry`] holds named pools for any number of item types, creating them on demand.
//!
//! Pooled instances are handed out as [`PoolObject<T>`] handles. Two handles are the same pool
//! member if the values they wrap are equal according to `T`'s [`Eq`] and [`Hash`].
//!
//! # Observers
//!
//! Each pool offers three notification channels, identified by [`PoolEvent`]: an object being
//! added to the pool, being spawned and being despawned. Observers are called synchronously, in
//! subscription order, on the thread that performed the operation.
//!
//! # Logging
//!
//! Pools emit [`tracing`] events: `trace` for individual spawns and despawns, `debug` when a pool
//! grows or is created and `warn` for rejected operations. No subscriber is installed by this
//! crate.
//!
//! # Example
//!
//! ```rust
//! use spawn_pool::{Pool, PoolEvent};
//!
//! #[derive(Debug, Eq, Hash, PartialEq)]
//! struct Projectile {
//!     id: u32,
//! }
//!
//! let mut next_id = 0;
//! let pool = Pool::builder(move || {
//!     next_id += 1;
//!     Projectile { id: next_id }
//! })
//! .name("projectiles")
//! .initial_size(2)
//! .build();
//!
//! pool.subscribe(PoolEvent::Spawned, |projectile| {
//!     println!("fired projectile {}", projectile.value().id);
//! });
//!
//! let first = pool.spawn();
//! assert_eq!(first.value().id, 2);
//! assert_eq!(pool.available(), 1);
//!
//! pool.despawn(first).unwrap();
//! assert_eq!(pool.available(), 2);
//! ```

mod builder;
mod constants;
mod error;
mod observers;
mod pool;
mod pool_object;
mod raw_pool;
mod registry;

pub use builder::*;
pub use error::*;
pub use observers::{PoolEvent, SubscriptionId};
pub(crate) use observers::Observers;
pub use pool::*;
pub use pool_object::*;
pub use raw_pool::{RawPool, RawSpawnMany};
pub(crate) use raw_pool::Factory;
pub use registry::*;
