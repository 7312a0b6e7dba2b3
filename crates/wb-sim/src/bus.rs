//! Synchronous publish/subscribe for [`Notification`]s.
//!
//! # Delivery
//!
//! `publish` calls every live subscriber, in subscription order, before it
//! returns.  A subscriber may subscribe, unsubscribe, or publish while being
//! called:
//!
//! - a [`Subscription`] dropped mid-delivery is not called again, including
//!   for the remainder of the current notification;
//! - a subscriber added mid-delivery first sees the next notification;
//! - a nested `publish` is queued and delivered after the current
//!   notification reaches every subscriber, so order is preserved.
//!
//! The bus is single-threaded (`Rc`), matching the tick loop.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::Notification;

type Handler = Box<dyn FnMut(&Notification)>;

#[derive(Default)]
struct Inner {
    next_id:    u64,
    handlers:   Vec<(u64, Handler)>,
    queue:      VecDeque<Notification>,
    publishing: bool,
    /// Subscriptions dropped while their handler was checked out.
    dropped:    Vec<u64>,
}

/// Cloneable handle to a shared subscriber list.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Inner>>,
}

/// Keeps a subscriber registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id:  u64,
    bus: Weak<RefCell<Inner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl FnMut(&Notification) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.handlers.push((id, Box::new(handler)));
        Subscription { id, bus: Rc::downgrade(&self.inner) }
    }

    /// Number of registered subscribers.
    ///
    /// Not meaningful from inside a subscriber, while the list is checked out.
    pub fn subscriber_count(&self) -> usize {
        let inner = self.inner.borrow();
        inner.handlers.len()
    }

    pub fn publish(&self, event: Notification) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.queue.push_back(event);
            if inner.publishing {
                return;
            }
            inner.publishing = true;
        }

        loop {
            let (event, mut handlers) = {
                let mut inner = self.inner.borrow_mut();
                let Some(event) = inner.queue.pop_front() else {
                    inner.publishing = false;
                    return;
                };
                (event, std::mem::take(&mut inner.handlers))
            };

            for (id, handler) in handlers.iter_mut() {
                if self.inner.borrow().dropped.contains(id) {
                    continue;
                }
                handler(&event);
            }

            // Re-attach: originals first, then anything subscribed meanwhile.
            let mut inner = self.inner.borrow_mut();
            let dropped = std::mem::take(&mut inner.dropped);
            let added = std::mem::take(&mut inner.handlers);
            handlers.retain(|(id, _)| !dropped.contains(id));
            handlers.extend(added);
            inner.handlers = handlers;
        }
    }
}

impl Subscription {
    /// `true` while the bus this subscription belongs to still exists.
    pub fn is_active(&self) -> bool {
        self.bus.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(bus) = self.bus.upgrade() else { return };
        let Ok(mut inner) = bus.try_borrow_mut() else { return };
        if let Some(pos) = inner.handlers.iter().position(|(id, _)| *id == self.id) {
            inner.handlers.remove(pos);
        } else if inner.publishing {
            inner.dropped.push(self.id);
        }
    }
}
