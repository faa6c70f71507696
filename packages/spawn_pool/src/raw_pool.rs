use std::any::type_name;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use foldhash::{HashSet, HashSetExt};
use tracing::{debug, trace, warn};

use crate::{Error, Observers, PoolBuilder, PoolEvent, PoolObject, Result, SubscriptionId};

pub(crate) type Factory<T> = Box<dyn FnMut() -> T + Send>;

/// A pool of reusable instances of `T` with a single owner.
///
/// The pool remembers every instance ever registered with it (the *total* set) and keeps the
/// instances that are currently free to be handed out on a LIFO stack (the *available*
/// collection). [`spawn()`][1] hands out the most recently returned instance, falling back to the
/// factory when nothing is available, and [`despawn()`][2] returns an instance to the pool.
///
/// Instances are never removed from the pool. Once registered, an instance alternates between
/// being available and being spawned for the rest of the pool's lifetime.
///
/// Observers can be registered for each transition via [`subscribe()`][3]. They are called
/// synchronously, in subscription order, after the pool state has been updated.
///
/// This type requires exclusive access for every operation. Use [`Pool`][crate::Pool] for a
/// cloneable handle that can be shared between threads.
///
/// # Example
///
/// ```rust
/// use spawn_pool::RawPool;
///
/// let mut next = 0_u32;
/// let mut pool = RawPool::new(move || {
///     next += 1;
///     next
/// });
///
/// let first = pool.spawn();
/// assert_eq!(*first.value(), 1);
/// assert_eq!(pool.total(), 1);
/// assert_eq!(pool.available(), 0);
///
/// pool.despawn(first).unwrap();
/// assert_eq!(pool.available(), 1);
///
/// // The returned instance is reused instead of creating a new one.
/// let again = pool.spawn();
/// assert_eq!(*again.value(), 1);
/// assert_eq!(pool.total(), 1);
/// ```
///
/// [1]: Self::spawn
/// [2]: Self::despawn
/// [3]: Self::subscribe
pub struct RawPool<T> {
    /// Every instance ever registered with the pool. Only ever grows.
    total: HashSet<PoolObject<T>>,

    /// Instances free to be spawned, most recently despawned last.
    available: Vec<PoolObject<T>>,

    /// Mirrors `available` so membership checks do not have to scan the stack.
    available_index: HashSet<PoolObject<T>>,

    factory: Factory<T>,

    observers: Observers<T>,

    /// Only used to label log events.
    name: Option<String>,
}

impl<T> RawPool<T>
where
    T: Eq + Hash,
{
    /// Creates an empty pool that uses `factory` to create new instances on demand.
    #[must_use]
    pub fn new<F>(factory: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        Self::new_inner(Box::new(factory), None, 0)
    }

    /// Creates an empty pool that creates new instances via [`Default`].
    #[must_use]
    pub fn with_default_factory() -> Self
    where
        T: Default + 'static,
    {
        Self::new(T::default)
    }

    /// Returns a builder for creating a pool with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spawn_pool::RawPool;
    ///
    /// let pool = RawPool::builder(String::new)
    ///     .name("labels")
    ///     .capacity(16)
    ///     .build_raw();
    ///
    /// assert_eq!(pool.name(), Some("labels"));
    /// ```
    pub fn builder<F>(factory: F) -> PoolBuilder<T>
    where
        F: FnMut() -> T + Send + 'static,
    {
        PoolBuilder::new(Box::new(factory))
    }

    pub(crate) fn new_inner(factory: Factory<T>, name: Option<String>, capacity: usize) -> Self {
        Self {
            total: HashSet::with_capacity(capacity),
            available: Vec::with_capacity(capacity),
            available_index: HashSet::with_capacity(capacity),
            factory,
            observers: Observers::new(),
            name,
        }
    }

    /// The name the pool was built with, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The number of instances currently free to be spawned.
    #[must_use]
    pub fn available(&self) -> usize {
        self.available.len()
    }

    /// The number of instances ever registered with the pool.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total.len()
    }

    /// Returns whether `object` has ever been registered with the pool.
    #[must_use]
    pub fn contains(&self, object: &PoolObject<T>) -> bool {
        self.total.contains(object)
    }

    /// Returns whether `object` is currently free to be spawned.
    #[must_use]
    pub fn is_available(&self, object: &PoolObject<T>) -> bool {
        self.available_index.contains(object)
    }

    /// Hands out an instance from the pool.
    ///
    /// The most recently despawned instance is handed out first. If no instance is available,
    /// the factory is called once and its result is registered with the pool before being handed
    /// out, which also notifies [`PoolEvent::ObjectAdded`] observers. A factory result equal to
    /// a member that is already spawned out is handed out as is, without growing the pool.
    ///
    /// The returned object is a member of the pool but is not available until it is despawned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spawn_pool::RawPool;
    ///
    /// let mut pool = RawPool::new(|| 'a');
    ///
    /// let object = pool.spawn();
    /// assert!(pool.contains(&object));
    /// assert!(!pool.is_available(&object));
    /// ```
    #[must_use]
    pub fn spawn(&mut self) -> PoolObject<T> {
        let object = match self.available.pop() {
            Some(object) => {
                self.available_index.remove(&object);
                object
            }
            None => self.spawn_new(),
        };

        trace!(
            pool = self.name(),
            available = self.available(),
            "spawned pool object"
        );
        self.observers.notify(PoolEvent::Spawned, &object);

        object
    }

    /// Returns a lazy iterator that spawns `count` instances, one per call to `next()`.
    ///
    /// Nothing is spawned until the iterator is consumed, and only as many instances are spawned
    /// as are actually pulled from it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spawn_pool::RawPool;
    ///
    /// let mut next = 0_u32;
    /// let mut pool = RawPool::new(move || {
    ///     next += 1;
    ///     next
    /// });
    ///
    /// let spawned: Vec<_> = pool.spawn_many(5).take(2).collect();
    /// assert_eq!(spawned.len(), 2);
    /// assert_eq!(pool.total(), 2);
    /// ```
    pub fn spawn_many(&mut self, count: usize) -> RawSpawnMany<'_, T> {
        RawSpawnMany {
            pool: self,
            remaining: count,
        }
    }

    /// Returns `object` to the pool so it can be spawned again.
    ///
    /// An object that is not yet a member of the pool (e.g. one wrapped outside of it) is first
    /// registered with the pool, notifying [`PoolEvent::ObjectAdded`] observers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyAvailable`] if the object is already available in the pool. The
    /// pool is left unchanged and no observers are notified.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spawn_pool::{Error, RawPool};
    ///
    /// let mut pool = RawPool::new(|| 1_u8);
    ///
    /// let object = pool.spawn();
    /// pool.despawn(object.clone()).unwrap();
    ///
    /// assert!(matches!(pool.despawn(object), Err(Error::AlreadyAvailable)));
    /// assert_eq!(pool.available(), 1);
    /// ```
    pub fn despawn(&mut self, object: PoolObject<T>) -> Result<()> {
        if self.is_available(&object) {
            warn!(
                pool = self.name(),
                "rejected despawn of a pool object that is already available"
            );
            return Err(Error::AlreadyAvailable);
        }

        if !self.contains(&object) {
            self.register(object.clone());
        }

        self.push_available(object.clone());

        trace!(
            pool = self.name(),
            available = self.available(),
            "despawned pool object"
        );
        self.observers.notify(PoolEvent::Despawned, &object);

        Ok(())
    }

    /// Despawns each object in iteration order, returning one result per object.
    ///
    /// A failure to despawn one object does not prevent the remaining ones from being despawned.
    pub fn despawn_each<I>(&mut self, objects: I) -> Vec<Result<()>>
    where
        I: IntoIterator<Item = PoolObject<T>>,
    {
        objects
            .into_iter()
            .map(|object| self.despawn(object))
            .collect()
    }

    /// Despawns every member of the pool that is currently spawned.
    ///
    /// Afterwards, every member of the pool is available. Returns the number of objects that
    /// were despawned, which is zero if the pool was already fully available.
    ///
    /// The order in which the objects land on the available stack is unspecified.
    pub fn despawn_all(&mut self) -> usize {
        let spawned: Vec<_> = self
            .total
            .iter()
            .filter(|object| !self.available_index.contains(*object))
            .cloned()
            .collect();

        let count = spawned.len();

        for object in spawned {
            self.push_available(object.clone());
            self.observers.notify(PoolEvent::Despawned, &object);
        }

        debug!(pool = self.name(), count, "despawned all pool objects");

        count
    }

    /// Adds `value` to the pool as a new available instance, bypassing the factory.
    ///
    /// Returns `false` without changing the pool if an equal instance is already a member.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spawn_pool::RawPool;
    ///
    /// let mut pool = RawPool::new(String::new);
    ///
    /// assert!(pool.add("spark".to_string()));
    /// assert!(!pool.add("spark".to_string()));
    /// assert_eq!(pool.total(), 1);
    /// ```
    pub fn add(&mut self, value: T) -> bool {
        self.add_object(PoolObject::new(value))
    }

    /// Adds an already wrapped instance to the pool as a new available instance.
    ///
    /// Returns `false` without changing the pool if an equal instance is already a member.
    pub fn add_object(&mut self, object: PoolObject<T>) -> bool {
        if self.contains(&object) {
            return false;
        }

        self.total.insert(object.clone());
        self.push_available(object.clone());

        trace!(pool = self.name(), total = self.total(), "added pool object");
        self.observers.notify(PoolEvent::ObjectAdded, &object);

        true
    }

    /// Adds each value to the pool, returning per value whether it was newly added.
    pub fn add_many<I>(&mut self, values: I) -> Vec<bool>
    where
        I: IntoIterator<Item = T>,
    {
        values.into_iter().map(|value| self.add(value)).collect()
    }

    /// Uses the factory to add `count` new instances to the pool.
    ///
    /// Instances produced by the factory that equal an existing member do not count toward
    /// `count`; the factory is called again instead. A factory that only ever produces existing
    /// members will therefore never let this return.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spawn_pool::RawPool;
    ///
    /// let mut next = 0_u32;
    /// let mut pool = RawPool::new(move || {
    ///     next += 1;
    ///     next
    /// });
    ///
    /// pool.create(3);
    /// assert_eq!(pool.total(), 3);
    /// assert_eq!(pool.available(), 3);
    /// ```
    pub fn create(&mut self, count: usize) {
        let mut created = 0_usize;

        while created < count {
            let value = (self.factory)();

            if self.add(value) {
                created = created.wrapping_add(1);
            }
        }

        debug!(
            pool = self.name(),
            count,
            total = self.total(),
            "created pool objects"
        );
    }

    /// Registers an observer for one kind of pool event.
    ///
    /// Observers are called synchronously, in subscription order, on the thread that performed
    /// the operation, after the pool state has been updated.
    pub fn subscribe<F>(&mut self, event: PoolEvent, callback: F) -> SubscriptionId
    where
        F: FnMut(&PoolObject<T>) + Send + 'static,
    {
        self.observers.subscribe(event, callback)
    }

    /// Removes a previously registered observer.
    ///
    /// Returns `false` if no observer with this ID is registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Calls the factory once and leaves the result spawned.
    ///
    /// Nothing is available at this point, so a result equal to an existing member equals one
    /// that is spawned out. It is handed out without being registered a second time.
    fn spawn_new(&mut self) -> PoolObject<T> {
        let object = PoolObject::new((self.factory)());

        if self.contains(&object) {
            trace!(
                pool = self.name(),
                total = self.total(),
                "factory produced an existing member"
            );
        } else {
            self.register(object.clone());

            debug!(
                pool = self.name(),
                total = self.total(),
                "grew pool through factory"
            );
        }

        object
    }

    /// Makes `object` a member without making it available.
    fn register(&mut self, object: PoolObject<T>) {
        self.total.insert(object.clone());

        trace!(
            pool = self.name(),
            total = self.total(),
            "registered pool object"
        );
        self.observers.notify(PoolEvent::ObjectAdded, &object);
    }

    fn push_available(&mut self, object: PoolObject<T>) {
        debug_assert!(self.total.contains(&object));

        self.available_index.insert(object.clone());
        self.available.push(object);
    }
}

impl<T> Default for RawPool<T>
where
    T: Eq + Hash + Default + 'static,
{
    fn default() -> Self {
        Self::with_default_factory()
    }
}

impl<T> fmt::Debug for RawPool<T> {
    #[cfg_attr(test, mutants::skip)] // Debug output is diagnostic only, not part of the contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawPool")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("name", &self.name)
            .field("total", &self.total.len())
            .field("available", &self.available.len())
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

/// Lazily spawns a fixed number of objects from a [`RawPool`].
///
/// Returned by [`RawPool::spawn_many()`].
#[derive(Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct RawSpawnMany<'a, T> {
    pool: &'a mut RawPool<T>,
    remaining: usize,
}

impl<T> Iterator for RawSpawnMany<'_, T>
where
    T: Eq + Hash,
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

impl<T> ExactSizeIterator for RawSpawnMany<'_, T> where T: Eq + Hash {}

impl<T> FusedIterator for RawSpawnMany<'_, T> where T: Eq + Hash {}
