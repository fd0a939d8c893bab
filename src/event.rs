//! Minimal publish-subscribe primitive with disposable subscriptions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Callback invoked with every fired value.
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

type ListenerList<T> = Mutex<Vec<(u64, Listener<T>)>>;

/// An ordered list of listeners that are called synchronously on `fire`.
pub struct Emitter<T> {
    listeners: Arc<ListenerList<T>>,
    next_id: AtomicU64,
}

impl<T: 'static> Emitter<T> {
    /// Creates an emitter with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self { listeners: Arc::new(Mutex::new(Vec::new())), next_id: AtomicU64::new(0) }
    }

    /// Registers a listener. It stays registered until the returned
    /// [`Subscription`] is disposed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));

        let weak: Weak<ListenerList<T>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(existing, _)| *existing != id);
            }
        })
    }

    /// Calls every listener in subscription order.
    ///
    /// The listener list is snapshotted first so listeners may subscribe,
    /// dispose, or fire again without deadlocking.
    pub fn fire(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle that releases a listener registration exactly once.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self { release: Some(Box::new(release)) }
    }

    /// Releases the registration. Subsequent calls do nothing.
    pub fn dispose(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// Returns `true` once the registration has been released.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.release.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("disposed", &self.is_disposed()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_listeners_in_subscription_order() {
        let emitter = Emitter::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        let _a = emitter.subscribe(move |v| first.lock().unwrap().push(format!("a{v}")));
        let second = Arc::clone(&seen);
        let _b = emitter.subscribe(move |v| second.lock().unwrap().push(format!("b{v}")));

        emitter.fire(&7);
        assert_eq!(*seen.lock().unwrap(), vec!["a7", "b7"]);
    }

    #[test]
    fn dispose_is_idempotent() {
        let emitter = Emitter::<()>::new();
        let mut keep = emitter.subscribe(|_| {});
        let mut sub = emitter.subscribe(|_| {});
        assert_eq!(emitter.listener_count(), 2);

        sub.dispose();
        sub.dispose();
        assert!(sub.is_disposed());
        assert_eq!(emitter.listener_count(), 1);

        keep.dispose();
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn dropping_subscription_releases_listener() {
        let emitter = Emitter::<()>::new();
        {
            let _sub = emitter.subscribe(|_| {});
            assert_eq!(emitter.listener_count(), 1);
        }
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn subscription_outliving_emitter_is_harmless() {
        let mut sub = {
            let emitter = Emitter::<()>::new();
            emitter.subscribe(|_| {})
        };
        sub.dispose();
        assert!(sub.is_disposed());
    }
}
