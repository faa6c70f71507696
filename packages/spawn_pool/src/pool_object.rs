use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{Error, Result};

/// A handle to exactly one pooled instance of `T`.
///
/// The pool keeps its own handles to every instance it has ever registered, so a `PoolObject` is
/// a shared handle: cloning it is cheap and yields another handle to the same instance, never a
/// copy of the value. The wrapped instance is fixed for the lifetime of the handle.
///
/// # Equality
///
/// Two handles compare and hash equal whenever the wrapped values do, as determined by `T`'s own
/// [`Eq`] and [`Hash`] implementations. This is what the pool uses to decide pool membership.
/// Use [`ptr_eq()`][Self::ptr_eq] to check whether two handles refer to the very same instance.
///
/// # Mutation
///
/// The wrapped value is only ever exposed by shared reference. Pooled types that carry mutable
/// state (for example the position of a projectile) should keep that state behind interior
/// mutability, and must not let it influence their [`Eq`] and [`Hash`] implementations.
///
/// # Example
///
/// ```rust
/// use spawn_pool::PoolObject;
///
/// let object = PoolObject::new(42_u32);
/// let same = object.clone();
///
/// assert_eq!(*object.value(), 42);
/// assert!(PoolObject::ptr_eq(&object, &same));
/// ```
pub struct PoolObject<T> {
    value: Arc<T>,
}

impl<T> PoolObject<T> {
    /// Wraps `value` into a new pool object.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(value),
        }
    }

    /// Wraps a value that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AbsentValue`] if `value` is `None`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spawn_pool::{Error, PoolObject};
    ///
    /// let object = PoolObject::from_option(Some("shell".to_string())).unwrap();
    /// assert_eq!(object.value(), "shell");
    ///
    /// let missing = PoolObject::<String>::from_option(None);
    /// assert!(matches!(missing, Err(Error::AbsentValue)));
    /// ```
    pub fn from_option(value: Option<T>) -> Result<Self> {
        value.map(Self::new).ok_or(Error::AbsentValue)
    }

    /// Returns a shared reference to the wrapped value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns whether both handles refer to the same instance, regardless of value equality.
    #[must_use]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.value, &other.value)
    }
}

impl<T> Clone for PoolObject<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> From<T> for PoolObject<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: PartialEq> PartialEq for PoolObject<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.value == *other.value
    }
}

impl<T: Eq> Eq for PoolObject<T> {}

impl<T: Hash> Hash for PoolObject<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for PoolObject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PoolObject").field(&*self.value).finish()
    }
}

/// Wraps any value into a [`PoolObject`] so it can be handed to a pool.
///
/// # Example
///
/// ```rust
/// use spawn_pool::{IntoPoolObject, RawPool};
///
/// let mut pool = RawPool::new(|| 0_u64);
///
/// // An object created outside the pool joins it when despawned.
/// pool.despawn(7_u64.into_pool_object()).unwrap();
/// assert_eq!(pool.total(), 1);
/// ```
pub trait IntoPoolObject: Sized {
    /// Wraps `self` into a new [`PoolObject`].
    fn into_pool_object(self) -> PoolObject<Self>;
}

impl<T> IntoPoolObject for T {
    fn into_pool_object(self) -> PoolObject<Self> {
        PoolObject::new(self)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;
    use std::collections::HashSet;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(PoolObject<u32>: Send, Sync, Clone);
    assert_not_impl_any!(PoolObject<Cell<u32>>: Sync);

    #[test]
    fn equal_values_are_equal_objects() {
        let a = PoolObject::new("bolt".to_string());
        let b = PoolObject::new("bolt".to_string());

        assert_eq!(a, b);
        assert!(!PoolObject::ptr_eq(&a, &b));

        let mut set = HashSet::new();
        assert!(set.insert(a));
        assert!(!set.insert(b));
    }

    #[test]
    fn clone_shares_instance() {
        let a = PoolObject::new(vec![1, 2, 3]);
        let b = a.clone();

        assert!(PoolObject::ptr_eq(&a, &b));
        assert_eq!(b.value(), &vec![1, 2, 3]);
    }

    #[test]
    fn absent_value_is_rejected() {
        let result = PoolObject::<u8>::from_option(None);
        assert!(matches!(result, Err(Error::AbsentValue)));
    }

    #[test]
    fn present_value_is_wrapped() {
        let object = PoolObject::from_option(Some(5_u8)).unwrap();
        assert_eq!(*object.value(), 5);
    }

    #[test]
    fn extension_trait_wraps() {
        let object = 'x'.into_pool_object();
        assert_eq!(object, PoolObject::from('x'));
    }
}
