//! Single-threaded notification primitive.
//!
//! Every notification in the crate (entity hooks, behaviour "performed",
//! solver publications, the shared input stream) is a [`Signal`]: a shared
//! list of listeners that are called synchronously, in connection order, on
//! the emitting thread.
//!
//! # Subscription lifetime
//!
//! [`Signal::connect`] returns a [`Subscription`] guard. Dropping the guard
//! disconnects the listener, so a component that owns its guards cannot leave
//! a standing subscription behind when it is dropped. Call
//! [`Subscription::forget`] to keep a listener for as long as the signal lives.
//!
//! # Re-entrancy
//!
//! `emit` snapshots the listener list before calling out, so listeners may
//! connect, disconnect or emit again. A listener disconnected during a fan-out
//! is skipped if it has not been called yet; a listener connected during a
//! fan-out is first called on the next emission.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use interplay_core::signal::Signal;
//!
//! let signal: Signal<u32> = Signal::new();
//! let total = Rc::new(Cell::new(0));
//!
//! let sink = Rc::clone(&total);
//! let guard = signal.connect(move |value| sink.set(sink.get() + value));
//!
//! signal.emit(&5);
//! drop(guard);
//! signal.emit(&7);
//!
//! assert_eq!(total.get(), 5);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<A> = Rc<dyn Fn(&A)>;

/// Shared listener storage behind a [`Signal`].
struct Listeners<A> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Listener<A>)>>,
}

impl<A> Listeners<A> {
    fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }
}

/// Type-erased access used by [`Subscription`] to disconnect its listener.
trait ListenerSlot {
    fn disconnect(&self, id: u64);
    fn is_connected(&self, id: u64) -> bool;
}

impl<A> ListenerSlot for Listeners<A> {
    fn disconnect(&self, id: u64) {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            entries
                .iter()
                .position(|(entry, _)| *entry == id)
                .map(|index| entries.remove(index))
        };
        // Dropped outside the borrow: the listener's captures may touch this signal.
        drop(removed);
    }

    fn is_connected(&self, id: u64) -> bool {
        self.entries.borrow().iter().any(|(entry, _)| *entry == id)
    }
}

// =============================================================================
// Signal
// =============================================================================

/// A cloneable handle to a list of listeners receiving `&A`.
///
/// Clones share the same listener list.
pub struct Signal<A: 'static = ()> {
    listeners: Rc<Listeners<A>>,
}

impl<A: 'static> Signal<A> {
    /// Creates a signal with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(Listeners::new()),
        }
    }

    /// Connects a listener and returns the guard that keeps it connected.
    pub fn connect(&self, listener: impl Fn(&A) + 'static) -> Subscription {
        let id = self.listeners.next_id.get();
        self.listeners.next_id.set(id + 1);
        self.listeners
            .entries
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let slot: Weak<dyn ListenerSlot> = Rc::downgrade(&self.listeners) as Weak<dyn ListenerSlot>;
        Subscription {
            slot: Some((slot, id)),
        }
    }

    /// Calls every connected listener with `args`.
    ///
    /// Returns the number of listeners that were called.
    pub fn emit(&self, args: &A) -> usize {
        let snapshot: Vec<(u64, Listener<A>)> = self
            .listeners
            .entries
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in snapshot {
            if self.listeners.is_connected(id) {
                listener(args);
                delivered += 1;
            }
        }
        delivered
    }

    /// Returns the number of connected listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.entries.borrow().len()
    }

    /// Returns true if no listener is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listener_count() == 0
    }
}

impl<A: 'static> Clone for Signal<A> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<A: 'static> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// Guard for one connected listener.
///
/// Dropping the guard disconnects the listener. Outliving the signal is fine:
/// the guard then has nothing left to disconnect.
#[must_use = "dropping a Subscription disconnects its listener immediately"]
pub struct Subscription {
    slot: Option<(Weak<dyn ListenerSlot>, u64)>,
}

impl Subscription {
    /// Disconnects the listener now.
    pub fn cancel(mut self) {
        self.release();
    }

    /// Leaves the listener connected for the rest of the signal's lifetime.
    pub fn forget(mut self) {
        self.slot = None;
    }

    /// Returns true while this guard still holds a connected listener.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.slot.as_ref().is_some_and(|(slot, id)| {
            slot.upgrade()
                .is_some_and(|listeners| listeners.is_connected(*id))
        })
    }

    fn release(&mut self) {
        if let Some((slot, id)) = self.slot.take() {
            if let Some(listeners) = slot.upgrade() {
                listeners.disconnect(id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
