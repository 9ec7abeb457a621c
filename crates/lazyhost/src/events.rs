//! Single-threaded event sources with disposable subscriptions.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dispose::Disposable;

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

impl<T> Listeners<T> {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }
}

/// Fans events out to subscribed listeners.
///
/// A subscription ends when it is disposed or dropped.
///
/// Listeners may dispose their own subscription, or any other, while an event
/// is being delivered. A listener removed mid-delivery is not called for the
/// remainder of that event. Re-entrant delivery to a listener that is still
/// running is skipped.
pub struct Emitter<T> {
    listeners: Rc<RefCell<Listeners<T>>>,
}

impl<T: 'static> Emitter<T> {
    /// Creates an emitter without listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Registers `listener` until the returned subscription is disposed.
    #[must_use]
    pub fn subscribe<F>(&self, listener: F) -> Box<dyn Disposable>
    where
        F: FnMut(&T) + 'static,
    {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        let entry: Listener<T> = Rc::new(RefCell::new(listener));
        listeners.entries.push((id, entry));
        Box::new(Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        })
    }

    /// Delivers `event` to every listener subscribed when delivery starts.
    pub fn fire(&self, event: &T) {
        let snapshot: Vec<(u64, Listener<T>)> = self.listeners.borrow().entries.clone();
        for (id, listener) in snapshot {
            if !self.listeners.borrow().contains(id) {
                continue;
            }
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (&mut *callback)(event);
            }
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Emitter")
            .field("listeners", &self.listeners.borrow().entries.len())
            .finish()
    }
}

struct Subscription<T> {
    id: u64,
    listeners: Weak<RefCell<Listeners<T>>>,
}

impl<T> Disposable for Subscription<T> {
    fn dispose(&mut self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        self.listeners = Weak::new();
        let removed = {
            let mut registered = listeners.borrow_mut();
            let id = self.id;
            registered
                .entries
                .iter()
                .position(|(entry, _)| *entry == id)
                .map(|index| registered.entries.remove(index))
        };
        // The listener may own other subscriptions; release it unborrowed.
        drop(removed);
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}
