use thiserror::Error;

/// Errors that can occur when working with pools and pooled objects.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller tried to wrap an absent value into a [`PoolObject`][crate::PoolObject].
    #[error("cannot wrap an absent value into a pool object")]
    AbsentValue,

    /// The caller tried to despawn an object that is already available in the pool.
    ///
    /// The pool state is left unchanged; the object remains available exactly once.
    #[error("the object is already available in the pool and cannot be despawned twice")]
    AlreadyAvailable,

    /// The caller tried to create a pool under a name that is already taken for that item type.
    #[error("a pool of '{type_name}' named '{name}' already exists")]
    PoolNameConflict {
        /// The name of the pooled item type.
        type_name: &'static str,

        /// The name that was already registered.
        name: String,
    },
}

/// A specialized `Result` type for pool operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn name_conflict_mentions_type_and_name() {
        let error = Error::PoolNameConflict {
            type_name: "u32",
            name: "fx".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("u32"));
        assert!(message.contains("fx"));
    }

    #[test]
    fn already_available_is_error() {
        let result: Result<()> = Err(Error::AlreadyAvailable);
        assert!(matches!(result, Err(Error::AlreadyAvailable)));
    }
}
