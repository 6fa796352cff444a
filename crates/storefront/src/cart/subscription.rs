//! Listener registry for cart change notifications.
//!
//! Listeners run synchronously on the calling thread, in registration order.
//! Each notification walks a snapshot of the registry, so a listener may
//! unsubscribe itself (or another listener) from inside its callback without
//! disturbing the current round.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::line::CartLine;

type Listener = Rc<RefCell<dyn FnMut(&[CartLine])>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Ordered set of cart listeners.
#[derive(Default)]
pub(crate) struct Listeners {
    registry: Rc<RefCell<Registry>>,
}

impl Listeners {
    pub(crate) fn add<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&[CartLine]) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        registry.entries.push((id, listener));

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub(crate) fn notify(&self, lines: &[CartLine]) {
        let snapshot: Vec<Listener> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            // A listener that is already running cannot be re-entered.
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (&mut *callback)(lines);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}

/// Handle returned by [`CartStore::subscribe`](super::CartStore::subscribe).
///
/// Dropping the handle keeps the listener registered; call
/// [`unsubscribe`](Self::unsubscribe) to stop notifications.
#[derive(Debug)]
#[must_use = "keep the subscription to be able to unsubscribe later"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Remove this listener. Other subscriptions are unaffected.
    ///
    /// Returns `false` if the listener was already gone (the store was
    /// dropped).
    pub fn unsubscribe(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = registry.borrow_mut();
        let before = registry.entries.len();
        registry.entries.retain(|(id, _)| *id != self.id);
        registry.entries.len() != before
    }

    /// Whether the listener is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| {
            registry
                .borrow()
                .entries
                .iter()
                .any(|(id, _)| *id == self.id)
        })
    }
}
