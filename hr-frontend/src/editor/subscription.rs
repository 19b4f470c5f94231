//! Scoped change listeners.
//!
//! A [`Subscription`] is the only handle to a registered listener; dropping
//! it unregisters the listener, so listeners cannot outlive their owner.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    next_id: AtomicU64,
    listeners: DashMap<u64, Listener<E>>,
}

pub struct ListenerRegistry<E> {
    inner: Arc<Registry<E>>,
}

impl<E> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                listeners: DashMap::new(),
            }),
        }
    }
}

impl<E> ListenerRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
        E: 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.insert(id, Arc::new(listener));

        let registry: Arc<dyn Unsubscribe> = self.inner.clone();
        Subscription {
            registry: Arc::downgrade(&registry),
            id,
        }
    }

    /// Call every listener in subscription order. Listeners may subscribe or
    /// drop subscriptions while being notified.
    pub fn notify(&self, event: &E) {
        let mut listeners: Vec<(u64, Listener<E>)> = self
            .inner
            .listeners
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        listeners.sort_unstable_by_key(|(id, _)| *id);

        for (_, listener) in listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.listeners.is_empty()
    }
}

trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: u64);
}

impl<E> Unsubscribe for Registry<E> {
    fn unsubscribe(&self, id: u64) {
        self.listeners.remove(&id);
    }
}

#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    registry: Weak<dyn Unsubscribe>,
    id: u64,
}

impl Subscription {
    /// Unregister now instead of at end of scope.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.id);
        }
    }
}
