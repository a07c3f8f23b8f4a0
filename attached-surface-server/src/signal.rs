//! Single-threaded signals for lifecycle notification
//!
//! Attached surfaces outlive none of the objects they watch: the drawable
//! they present, and the toplevel they hang off. Those collaborators each
//! carry [`Signal`]s for the events this crate reacts to, and every listener
//! registration hands back a [`Subscription`] so the registration can be
//! dropped deterministically when the watching object goes away first.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// A broadcast signal delivering events of type `E`
///
/// Cloning the signal yields another handle to the same listener list.
pub struct Signal<E> {
    inner: Rc<SignalInner<E>>,
}

struct SignalInner<E> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, Rc<dyn Fn(&E)>)>>,
}

trait Detach {
    fn detach(&self, id: u64);
}

impl<E> Detach for SignalInner<E> {
    fn detach(&self, id: u64) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }
}

impl<E: 'static> Signal<E> {
    /// Create a signal with no listeners
    pub fn new() -> Signal<E> {
        Signal {
            inner: Rc::new(SignalInner {
                next_id: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register `callback` to run on every emitted event
    ///
    /// The callback stays registered for as long as the returned
    /// [`Subscription`] is alive.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let callback: Rc<dyn Fn(&E)> = Rc::new(callback);
        self.inner.listeners.borrow_mut().push((id, callback));
        let weak = Rc::downgrade(&self.inner);
        let target: Weak<dyn Detach> = weak;
        Subscription { target, id }
    }

    /// Deliver `event` to every listener
    ///
    /// The listener list is snapshotted before delivery, so callbacks may
    /// subscribe and unsubscribe freely: listeners added during delivery are
    /// not invoked for the current event, and listeners removed during
    /// delivery are skipped.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(u64, Rc<dyn Fn(&E)>)> = self.inner.listeners.borrow().clone();
        for (id, callback) in snapshot {
            let live = self.inner.listeners.borrow().iter().any(|(lid, _)| *lid == id);
            if live {
                callback(event);
            }
        }
    }
}

impl<E: 'static> Default for Signal<E> {
    fn default() -> Self {
        Signal::new()
    }
}

impl<E> Clone for Signal<E> {
    fn clone(&self) -> Self {
        Signal { inner: self.inner.clone() }
    }
}

impl<E> std::fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("listeners", &self.inner.listeners.borrow().len()).finish()
    }
}

/// Handle keeping a signal subscription alive
///
/// Dropping the handle detaches the callback. Dropping it after the signal
/// itself is gone does nothing.
#[derive(Debug)]
pub struct Subscription {
    target: Weak<dyn Detach>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(target) = self.target.upgrade() {
            target.detach(self.id);
        }
    }
}
