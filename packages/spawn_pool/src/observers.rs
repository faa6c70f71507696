use std::fmt;

use crate::PoolObject;

/// Identifies the notification channel an observer subscribes to.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use spawn_pool::{PoolEvent, RawPool};
///
/// let spawned = Arc::new(AtomicUsize::new(0));
///
/// let mut pool = RawPool::new(|| 0_u32);
/// pool.subscribe(PoolEvent::Spawned, {
///     let spawned = Arc::clone(&spawned);
///     move |_| {
///         spawned.fetch_add(1, Ordering::Relaxed);
///     }
/// });
///
/// let _object = pool.spawn();
/// assert_eq!(spawned.load(Ordering::Relaxed), 1);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum PoolEvent {
    /// An object became a member of the pool, either explicitly added, created by the factory
    /// or registered because it was despawned into a pool it did not belong to yet.
    ObjectAdded,

    /// An object was handed out by the pool.
    Spawned,

    /// An object was returned to the pool and is available again.
    Despawned,
}

/// Identifies an observer registration so it can later be removed.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&PoolObject<T>) + Send>;

struct Subscription<T> {
    id: SubscriptionId,
    event: PoolEvent,
    callback: Callback<T>,
}

/// The observers registered on one pool, kept in subscription order.
pub(crate) struct Observers<T> {
    subscriptions: Vec<Subscription<T>>,
    next_id: u64,
}

impl<T> Observers<T> {
    pub(crate) fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn subscribe<F>(&mut self, event: PoolEvent, callback: F) -> SubscriptionId
    where
        F: FnMut(&PoolObject<T>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        self.subscriptions.push(Subscription {
            id,
            event,
            callback: Box::new(callback),
        });

        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    /// Invokes every observer of `event` with `object`, in subscription order.
    pub(crate) fn notify(&mut self, event: PoolEvent, object: &PoolObject<T>) {
        for subscription in &mut self.subscriptions {
            if subscription.event == event {
                (subscription.callback)(object);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.subscriptions.len()
    }
}

impl<T> fmt::Debug for Observers<T> {
    #[cfg_attr(test, mutants::skip)] // Debug output is diagnostic only, not part of the contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscriptions", &self.subscriptions.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
