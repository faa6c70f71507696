use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use foldhash::{HashMap, HashMapExt};
use tracing::{debug, warn};

use crate::constants::ERR_POISONED_LOCK;
use crate::{Error, Pool, PoolObject, RawPool, Result};

/// The name of the pool that callers use when they have no reason to pick a specific one.
pub const DEFAULT_POOL_NAME: &str = "";

/// Each value is a `Pool<T>` where `T` is the item type in its key.
type PoolMap = HashMap<PoolKey, Box<dyn Any + Send + Sync>>;

#[derive(Debug, Eq, Hash, PartialEq)]
struct PoolKey {
    item_type: TypeId,
    name: String,
}

impl PoolKey {
    fn of<T: 'static>(name: &str) -> Self {
        Self {
            item_type: TypeId::of::<T>(),
            name: name.to_owned(),
        }
    }
}

/// A set of named pools, keyed by item type and name.
///
/// Each item type has its own namespace: a pool of `u32` named `"fx"` and a pool of `String`
/// named `"fx"` are unrelated. Pools are created on first use and live as long as the registry.
///
/// The registry is an ordinary value. Create one wherever your application keeps its shared
/// state and hand out references (or an `Arc`) to the code that needs pools.
///
/// # Example
///
/// ```rust
/// use spawn_pool::{DEFAULT_POOL_NAME, Pool, PoolRegistry};
///
/// let registry = PoolRegistry::new();
///
/// let projectiles = registry.get_or_create_pool::<u64>("projectiles");
/// let same = registry.get_or_create_pool::<u64>("projectiles");
/// assert!(Pool::ptr_eq(&projectiles, &same));
///
/// let default = registry.get_or_create_pool::<u64>(DEFAULT_POOL_NAME);
/// assert!(!Pool::ptr_eq(&projectiles, &default));
/// ```
pub struct PoolRegistry {
    pools: Mutex<PoolMap>,
}

impl PoolRegistry {
    /// Creates a registry without any pools.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the pool of `T` with the given name, creating it if it does not exist yet.
    ///
    /// A newly created pool creates its instances via [`Default`].
    #[must_use]
    pub fn get_or_create_pool<T>(&self, name: &str) -> Pool<T>
    where
        T: Eq + Hash + Send + Sync + Default + 'static,
    {
        self.get_or_create_pool_with(name, T::default)
    }

    /// Returns the pool of `T` with the given name, creating it with `factory` if it does not
    /// exist yet.
    ///
    /// The factory is only used when the pool is created by this call. Lookup and creation
    /// happen as one step, so concurrent callers asking for the same name always receive the
    /// same pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spawn_pool::PoolRegistry;
    ///
    /// let registry = PoolRegistry::new();
    ///
    /// let pool = registry.get_or_create_pool_with("greetings", || "hello".to_string());
    /// assert_eq!(pool.spawn().value(), "hello");
    ///
    /// // The existing pool keeps its original factory.
    /// let pool = registry.get_or_create_pool_with("greetings", || "bye".to_string());
    /// pool.despawn_all();
    /// assert_eq!(pool.spawn().value(), "hello");
    /// ```
    #[must_use]
    pub fn get_or_create_pool_with<T, F>(&self, name: &str, factory: F) -> Pool<T>
    where
        T: Eq + Hash + Send + Sync + 'static,
        F: FnMut() -> T + Send + 'static,
    {
        let mut pools = self.lock();

        if let Some(pool) = Self::downcast::<T>(&pools, name) {
            return pool;
        }

        let pool = Pool::from(RawPool::builder(factory).name(name).build_raw());
        Self::insert(&mut pools, name, pool.clone());

        pool
    }

    /// Creates a new pool of `T` under the given name.
    ///
    /// If `initial_size` is given, the pool is filled with that many factory-made instances
    /// before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolNameConflict`] if a pool of `T` with this name already exists. The
    /// existing pool is left untouched and the factory is not called.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spawn_pool::{Error, PoolRegistry};
    ///
    /// let registry = PoolRegistry::new();
    ///
    /// let pool = registry.create_new_pool("sparks", || 0_u8, Some(1)).unwrap();
    /// assert_eq!(pool.available(), 1);
    ///
    /// let again = registry.create_new_pool("sparks", || 0_u8, None);
    /// assert!(matches!(again, Err(Error::PoolNameConflict { .. })));
    /// ```
    pub fn create_new_pool<T, F>(
        &self,
        name: &str,
        factory: F,
        initial_size: Option<usize>,
    ) -> Result<Pool<T>>
    where
        T: Eq + Hash + Send + Sync + 'static,
        F: FnMut() -> T + Send + 'static,
    {
        let mut pools = self.lock();

        if pools.contains_key(&PoolKey::of::<T>(name)) {
            warn!(
                pool = name,
                item_type = type_name::<T>(),
                "refused to create pool under a name that is already taken"
            );

            return Err(Error::PoolNameConflict {
                type_name: type_name::<T>(),
                name: name.to_owned(),
            });
        }

        let pool = RawPool::builder(factory)
            .name(name)
            .initial_size(initial_size.unwrap_or_default())
            .build();
        Self::insert(&mut pools, name, pool.clone());

        Ok(pool)
    }

    /// Returns whether a pool of `T` with the given name exists.
    #[must_use]
    pub fn contains_pool<T: 'static>(&self, name: &str) -> bool {
        self.lock().contains_key(&PoolKey::of::<T>(name))
    }

    /// Returns the names of all pools of `T`, in no particular order.
    #[must_use]
    pub fn pool_names<T: 'static>(&self) -> Vec<String> {
        let item_type = TypeId::of::<T>();

        self.lock()
            .keys()
            .filter(|key| key.item_type == item_type)
            .map(|key| key.name.clone())
            .collect()
    }

    /// Despawns `object` into the pool of `T` with the given name, creating that pool if it does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyAvailable`] if the object is already available in that pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spawn_pool::{DEFAULT_POOL_NAME, IntoPoolObject, PoolRegistry};
    ///
    /// let registry = PoolRegistry::new();
    ///
    /// registry
    ///     .despawn_into(DEFAULT_POOL_NAME, 5_u32.into_pool_object())
    ///     .unwrap();
    ///
    /// let pool = registry.get_or_create_pool::<u32>(DEFAULT_POOL_NAME);
    /// assert_eq!(pool.available(), 1);
    /// ```
    pub fn despawn_into<T>(&self, name: &str, object: PoolObject<T>) -> Result<()>
    where
        T: Eq + Hash + Send + Sync + Default + 'static,
    {
        self.get_or_create_pool::<T>(name).despawn(object)
    }

    fn downcast<T: 'static>(pools: &PoolMap, name: &str) -> Option<Pool<T>> {
        pools
            .get(&PoolKey::of::<T>(name))
            .and_then(|pool| pool.downcast_ref::<Pool<T>>())
            .cloned()
    }

    fn insert<T>(pools: &mut PoolMap, name: &str, pool: Pool<T>)
    where
        T: Eq + Hash + Send + Sync + 'static,
    {
        debug!(
            pool = name,
            item_type = type_name::<T>(),
            "registered new pool"
        );

        pools.insert(PoolKey::of::<T>(name), Box::new(pool));
    }

    fn lock(&self) -> MutexGuard<'_, PoolMap> {
        self.pools.lock().expect(ERR_POISONED_LOCK)
    }
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PoolRegistry {
    #[cfg_attr(test, mutants::skip)] // Debug output is diagnostic only, not part of the contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("pools", &self.lock().len())
            .finish()
    }
}
