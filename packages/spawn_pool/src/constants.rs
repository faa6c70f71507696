// A poisoned lock means an observer or factory panicked halfway through a pool operation. The
// pool invariants can no longer be trusted, so we refuse to continue.
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned lock - pool bookkeeping may be \
    inconsistent because a factory or observer panicked while the pool was being modified";
