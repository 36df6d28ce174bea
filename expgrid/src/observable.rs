//! Observable values with explicit subscriptions.

use std::sync::Arc;
use std::sync::RwLock;
use std::sync::Weak;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

/// A value that notifies subscribers when it changes.
///
/// Cheap to clone; clones share the value and the subscriber list.
/// Subscribers are called after the lock is released, so a callback may
/// read the observable again.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use expgrid::Observable;
///
/// let open = Observable::new(false);
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
/// let subscription = open.subscribe(move |_| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// open.set(true);
/// open.set(true); // unchanged, no notification
/// subscription.unsubscribe();
/// open.set(false);
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub struct Observable<T> {
    inner: Arc<RwLock<Inner<T>>>,
}

impl<T> Observable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                value,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value
    pub fn get(&self) -> T {
        match self.inner.read() {
            Ok(guard) => guard.value.clone(),
            Err(poisoned) => poisoned.into_inner().value.clone(),
        }
    }

    /// Set a new value. Subscribers are notified only if it changed.
    /// Returns true if it changed.
    pub fn set(&self, value: T) -> bool {
        let callbacks = {
            let Ok(mut guard) = self.inner.write() else {
                return false;
            };
            if guard.value == value {
                return false;
            }
            guard.value = value.clone();
            guard
                .subscribers
                .iter()
                .map(|(_, cb)| Arc::clone(cb))
                .collect::<Vec<_>>()
        };
        for callback in callbacks {
            callback(&value);
        }
        true
    }

    /// Update the value using a closure
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.get());
        self.set(next)
    }

    /// Register `callback`. It stays registered until the returned
    /// subscription is unsubscribed or dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = match self.inner.write() {
            Ok(mut guard) => {
                let id = guard.next_id;
                guard.next_id += 1;
                guard.subscribers.push((id, Arc::new(callback)));
                id
            }
            Err(_) => return Subscription::detached(),
        };

        let weak: Weak<RwLock<Inner<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade()
                    && let Ok(mut guard) = inner.write()
                {
                    guard.subscribers.retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.read().map(|g| g.subscribers.len()).unwrap_or(0)
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Observable<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.read() {
            Ok(guard) => f
                .debug_struct("Observable")
                .field("value", &guard.value)
                .field("subscribers", &guard.subscribers.len())
                .finish(),
            Err(_) => f.write_str("Observable(<poisoned>)"),
        }
    }
}

impl<T> Default for Observable<T>
where
    T: Default + Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Handle to a registered callback. Unsubscribes on drop.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn detached() -> Self {
        Self { cancel: None }
    }

    /// Remove the callback now.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_notifies_on_change_only() {
        let value = Observable::new(1);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = value.subscribe(move |v| sink.lock().unwrap().push(*v));

        assert!(value.set(2));
        assert!(!value.set(2));
        assert!(value.update(|v| v + 1));
        assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let value = Observable::new(false);
        let sub = value.subscribe(|_| {});
        assert_eq!(value.subscriber_count(), 1);
        drop(sub);
        assert_eq!(value.subscriber_count(), 0);
    }

    #[test]
    fn test_callback_can_read_value() {
        let value = Observable::new(0);
        let reader = value.clone();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let _sub = value.subscribe(move |_| *sink.lock().unwrap() = Some(reader.get()));
        value.set(5);
        assert_eq!(*seen.lock().unwrap(), Some(5));
    }
}
