//! "Cart changed" notifications.
//!
//! The cart store publishes an argument-less notification after every
//! mutation it persists. Views subscribe, and on each notification re-read
//! whatever cart state they render. Several stores may share one
//! [`ChangeSignal`] by cloning it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Receives cart change notifications.
pub trait CartObserver: Send + Sync {
    /// Called after the cart's persisted state changed.
    fn cart_changed(&self);
}

impl<F> CartObserver for F
where
    F: Fn() + Send + Sync,
{
    fn cart_changed(&self) {
        self();
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: Vec<(u64, Arc<dyn CartObserver>)>,
}

/// Publish/subscribe hub for cart changes.
#[derive(Clone, Default)]
pub struct ChangeSignal {
    registry: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for ChangeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSignal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl ChangeSignal {
    /// Create a signal with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. It stays registered until the returned
    /// [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, observer: impl CartObserver + 'static) -> Subscription {
        let observer: Arc<dyn CartObserver> = Arc::new(observer);
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.observers.push((id, observer));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Notify every current subscriber.
    pub fn publish(&self) {
        // Observers run outside the lock so they may subscribe or read the
        // cart again without deadlocking.
        let observers: Vec<Arc<dyn CartObserver>> = lock(&self.registry)
            .observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        tracing::trace!(subscribers = observers.len(), "cart changed");
        for observer in observers {
            observer.cart_changed();
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).observers.len()
    }
}

/// Handle for a registered observer; unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry)
                .observers
                .retain(|(id, _)| *id != self.id);
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
