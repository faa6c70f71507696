use std::any::type_name;
use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::{Factory, Pool, RawPool};

/// Builder for creating an instance of [`RawPool`] or [`Pool`].
///
/// You only need to use this builder if you want to customize the pool configuration.
/// [`RawPool::new()`] and [`Pool::new()`] are sufficient for most use cases.
///
/// # Examples
///
/// ```
/// use spawn_pool::Pool;
///
/// let pool = Pool::builder(|| vec![0_u8; 64])
///     .name("buffers")
///     .initial_size(1)
///     .build();
///
/// assert_eq!(pool.total(), 1);
/// assert_eq!(pool.available(), 1);
/// ```
#[must_use]
pub struct PoolBuilder<T> {
    factory: Factory<T>,
    name: Option<String>,
    initial_size: usize,
    capacity: usize,
}

impl<T> fmt::Debug for PoolBuilder<T> {
    #[cfg_attr(test, mutants::skip)] // Debug output is diagnostic only, not part of the contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolBuilder")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("name", &self.name)
            .field("initial_size", &self.initial_size)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<T> PoolBuilder<T>
where
    T: Eq + Hash,
{
    pub(crate) fn new(factory: Factory<T>) -> Self {
        Self {
            factory,
            name: None,
            initial_size: 0,
            capacity: 0,
        }
    }

    /// Sets the name of the pool. The name labels the log events emitted by the pool.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets how many instances the factory creates up front when the pool is built.
    ///
    /// The created instances are all available. Defaults to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use spawn_pool::RawPool;
    ///
    /// let mut next = 0_u32;
    /// let pool = RawPool::builder(move || {
    ///     next += 1;
    ///     next
    /// })
    /// .initial_size(8)
    /// .build_raw();
    ///
    /// assert_eq!(pool.available(), 8);
    /// ```
    pub fn initial_size(mut self, initial_size: usize) -> Self {
        self.initial_size = initial_size;
        self
    }

    /// Reserves room for at least `capacity` instances so the pool does not reallocate its
    /// bookkeeping until it grows beyond that. The pool is never limited to this size.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds a single-owner pool with the specified configuration.
    #[must_use]
    pub fn build_raw(self) -> RawPool<T> {
        let capacity = self.capacity.max(self.initial_size);
        let mut pool = RawPool::new_inner(self.factory, self.name, capacity);

        if self.initial_size > 0 {
            debug!(
                pool = pool.name(),
                initial_size = self.initial_size,
                "prewarming pool"
            );
            pool.create(self.initial_size);
        }

        pool
    }

    /// Builds a shareable pool with the specified configuration.
    #[must_use]
    pub fn build(self) -> Pool<T>
    where
        T: Send + Sync + 'static,
    {
        Pool::from(self.build_raw())
    }
}
