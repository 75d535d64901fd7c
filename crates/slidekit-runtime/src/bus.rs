#![forbid(unsafe_code)]

//! Typed, keyed publish/subscribe channel.
//!
//! An [`EventBus<E>`] replaces a process-wide string-keyed notification
//! center: it is created by the host, injected into whoever publishes or
//! subscribes, and carries a typed event. The key is kept so a drawer can
//! refuse a bus configured for another toggle key.
//!
//! Cloning a bus yields another handle to the same subscriber list.
//!
//! # Invariants
//!
//! 1. Subscribers are called in registration order.
//! 2. Dropping a [`BusSubscription`] stops delivery; the dead entry is
//!    pruned on the next publish.
//! 3. No borrow is held while callbacks run, so a callback may publish or
//!    subscribe on the same bus.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type CallbackRc<E> = Rc<dyn Fn(&E)>;
type CallbackWeak<E> = Weak<dyn Fn(&E)>;

struct BusInner<E> {
    key: String,
    subscribers: Vec<CallbackWeak<E>>,
}

/// A keyed channel of `E` events.
pub struct EventBus<E> {
    inner: Rc<RefCell<BusInner<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("key", &inner.key)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<E: 'static> EventBus<E> {
    /// Create a bus named `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                key: key.into(),
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn key(&self) -> String {
        self.inner.borrow().key.clone()
    }

    /// Whether this bus is named `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.inner.borrow().key == key
    }

    /// Register `callback`. Delivery stops when the returned guard drops.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> BusSubscription {
        let strong: CallbackRc<E> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        tracing::trace!(
            target: "slidekit.bus",
            key = %self.inner.borrow().key,
            "subscriber added"
        );
        BusSubscription {
            _guard: Box::new(strong),
        }
    }

    /// Deliver `event` to every live subscriber. Returns how many received it.
    pub fn publish(&self, event: &E) -> usize {
        let callbacks: Vec<CallbackRc<E>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect()
        };
        tracing::trace!(
            target: "slidekit.bus",
            key = %self.inner.borrow().key,
            delivered = callbacks.len(),
            "event published"
        );
        for callback in &callbacks {
            callback(event);
        }
        callbacks.len()
    }

    /// Registered subscribers, including dead ones not yet pruned.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// RAII guard for a bus subscriber.
pub struct BusSubscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for BusSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusSubscription").finish_non_exhaustive()
    }
}
