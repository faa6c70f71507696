use std::hash::Hash;
use std::iter::FusedIterator;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::constants::ERR_POISONED_LOCK;
use crate::{PoolBuilder, PoolEvent, PoolObject, RawPool, Result, SubscriptionId};

/// A thread-safe handle to a shared [`RawPool`].
///
/// This type acts as a cloneable handle to a shared pool instance. Multiple handles can exist
/// simultaneously and all of them operate on the same pool, which remains alive as long as at
/// least one handle exists.
///
/// Every operation takes the pool's lock for its full duration, so each operation is atomic with
/// respect to the others.
///
/// # Observers
///
/// Observers registered via [`subscribe()`][1] are called while the pool lock is held. They must
/// not call back into the same pool, as that would deadlock.
///
/// # Example
///
/// ```rust
/// use std::thread;
///
/// use spawn_pool::Pool;
///
/// let pool = Pool::new(String::new);
/// let pool_clone = pool.clone();
///
/// thread::spawn(move || {
///     let object = pool_clone.spawn();
///     pool_clone.despawn(object).unwrap();
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(pool.total(), 1);
/// assert_eq!(pool.available(), 1);
/// ```
///
/// [1]: Self::subscribe
#[derive(Debug)]
pub struct Pool<T> {
    inner: Arc<Mutex<RawPool<T>>>,
}

impl<T> Clone for Pool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<RawPool<T>> for Pool<T>
where
    T: Eq + Hash + Send + Sync + 'static,
{
    /// Moves an existing single-owner pool behind a shareable handle.
    fn from(pool: RawPool<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }
}

impl<T> Pool<T>
where
    T: Eq + Hash + Send + Sync + 'static,
{
    /// Creates an empty pool that uses `factory` to create new instances on demand.
    #[must_use]
    pub fn new<F>(factory: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        Self::from(RawPool::new(factory))
    }

    /// Creates an empty pool that creates new instances via [`Default`].
    #[must_use]
    pub fn with_default_factory() -> Self
    where
        T: Default,
    {
        Self::from(RawPool::with_default_factory())
    }

    /// Returns a builder for creating a pool with custom configuration.
    pub fn builder<F>(factory: F) -> PoolBuilder<T>
    where
        F: FnMut() -> T + Send + 'static,
    {
        RawPool::builder(factory)
    }

    /// Returns whether both handles refer to the same pool.
    #[must_use]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }

    /// The name the pool was built with, if any.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.lock().name().map(ToOwned::to_owned)
    }

    /// The number of instances currently free to be spawned.
    #[must_use]
    pub fn available(&self) -> usize {
        self.lock().available()
    }

    /// The number of instances ever registered with the pool.
    #[must_use]
    pub fn total(&self) -> usize {
        self.lock().total()
    }

    /// Returns whether `object` has ever been registered with the pool.
    #[must_use]
    pub fn contains(&self, object: &PoolObject<T>) -> bool {
        self.lock().contains(object)
    }

    /// Returns whether `object` is currently free to be spawned.
    #[must_use]
    pub fn is_available(&self, object: &PoolObject<T>) -> bool {
        self.lock().is_available(object)
    }

    /// Hands out an instance from the pool. See [`RawPool::spawn()`].
    #[must_use]
    pub fn spawn(&self) -> PoolObject<T> {
        self.lock().spawn()
    }

    /// Returns a lazy iterator that spawns `count` instances, one per call to `next()`.
    ///
    /// The pool lock is taken separately for each spawned instance, so other handles may use
    /// the pool between two items.
    pub fn spawn_many(&self, count: usize) -> SpawnMany<T> {
        SpawnMany {
            pool: self.clone(),
            remaining: count,
        }
    }

    /// Returns `object` to the pool so it can be spawned again. See [`RawPool::despawn()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyAvailable`][crate::Error::AlreadyAvailable] if the object is
    /// already available in the pool.
    pub fn despawn(&self, object: PoolObject<T>) -> Result<()> {
        self.lock().despawn(object)
    }

    /// Despawns each object in iteration order, returning one result per object.
    ///
    /// The whole batch is despawned under a single acquisition of the pool lock.
    pub fn despawn_each<I>(&self, objects: I) -> Vec<Result<()>>
    where
        I: IntoIterator<Item = PoolObject<T>>,
    {
        self.lock().despawn_each(objects)
    }

    /// Despawns every member of the pool that is currently spawned. See
    /// [`RawPool::despawn_all()`].
    pub fn despawn_all(&self) -> usize {
        self.lock().despawn_all()
    }

    /// Adds `value` to the pool as a new available instance. See [`RawPool::add()`].
    pub fn add(&self, value: T) -> bool {
        self.lock().add(value)
    }

    /// Adds an already wrapped instance to the pool. See [`RawPool::add_object()`].
    pub fn add_object(&self, object: PoolObject<T>) -> bool {
        self.lock().add_object(object)
    }

    /// Adds each value to the pool, returning per value whether it was newly added.
    pub fn add_many<I>(&self, values: I) -> Vec<bool>
    where
        I: IntoIterator<Item = T>,
    {
        self.lock().add_many(values)
    }

    /// Uses the factory to add `count` new instances to the pool. See [`RawPool::create()`].
    pub fn create(&self, count: usize) {
        self.lock().create(count);
    }

    /// Registers an observer for one kind of pool event. See [`RawPool::subscribe()`].
    pub fn subscribe<F>(&self, event: PoolEvent, callback: F) -> SubscriptionId
    where
        F: FnMut(&PoolObject<T>) + Send + 'static,
    {
        self.lock().subscribe(event, callback)
    }

    /// Removes a previously registered observer.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().unsubscribe(id)
    }

    fn lock(&self) -> MutexGuard<'_, RawPool<T>> {
        self.inner.lock().expect(ERR_POISONED_LOCK)
    }
}

impl<T> Default for Pool<T>
where
    T: Eq + Hash + Send + Sync + Default + 'static,
{
    fn default() -> Self {
        Self::with_default_factory()
    }
}

/// Lazily spawns a fixed number of objects from a [`Pool`].
///
/// Returned by [`Pool::spawn_many()`].
#[derive(Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct SpawnMany<T> {
    pool: Pool<T>,
    remaining: usize,
}

impl<T> Iterator for SpawnMany<T>
where
    T: Eq + Hash + Send + Sync + 'static,
{
    type Item = PoolObject<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining = self.remaining.checked_sub(1)?;
        Some(self.pool.spawn())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for SpawnMany<T> where T: Eq + Hash + Send + Sync + 'static {}

impl<T> FusedIterator for SpawnMany<T> where T: Eq + Hash + Send + Sync + 'static {}
