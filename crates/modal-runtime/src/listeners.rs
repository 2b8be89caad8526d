#![forbid(unsafe_code)]

//! Ordered listener registry with set semantics.
//!
//! [`ListenerSet<A>`] stores callbacks as `Rc<dyn Fn(&A)>` and identifies
//! them by pointer, so registering the same `Rc` twice does not lead to
//! duplicate delivery.
//!
//! # Invariants
//!
//! - Listeners fire in registration order.
//! - `fire_all` works on a snapshot of the registered listeners: a listener
//!   added during a fire is not called in that pass, and a listener removed
//!   during a fire may still be called in that pass.
//! - No internal borrow is held while a listener runs, so listeners may call
//!   back into the set.
//!
//! # Failure Modes
//!
//! - A panicking listener propagates; the remaining listeners of that pass
//!   are skipped.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A shared callback receiving the fired argument by reference.
pub type Listener<A> = Rc<dyn Fn(&A)>;

/// Ordered set of callbacks.
pub struct ListenerSet<A: ?Sized> {
    listeners: RefCell<Vec<Listener<A>>>,
}

impl<A: ?Sized> Default for ListenerSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized> fmt::Debug for ListenerSet<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.len())
            .finish()
    }
}

impl<A: ?Sized> ListenerSet<A> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Register a listener.
    ///
    /// Returns `false` if this exact `Rc` is already registered.
    pub fn add(&self, listener: Listener<A>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        if listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Unregister a listener by identity.
    ///
    /// Returns `false` if it was not registered.
    pub fn remove(&self, listener: &Listener<A>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|l| Rc::ptr_eq(l, listener)) {
            Some(idx) => {
                listeners.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Whether this exact `Rc` is registered.
    #[must_use]
    pub fn contains(&self, listener: &Listener<A>) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|l| Rc::ptr_eq(l, listener))
    }

    /// Number of registered listeners.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Whether no listener is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Drop every registered listener.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Invoke every registered listener with `arg`, in registration order.
    pub fn fire_all(&self, arg: &A) {
        let snapshot: Vec<Listener<A>> = self.listeners.borrow().clone();
        for listener in &snapshot {
            listener(arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Listener<()>) {
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let listener: Listener<()> = Rc::new(move |_: &()| hits_clone.set(hits_clone.get() + 1));
        (hits, listener)
    }

    #[test]
    fn empty_set() {
        let set = ListenerSet::<()>::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        set.fire_all(&());
    }

    #[test]
    fn fire_all_calls_every_listener() {
        let set = ListenerSet::new();
        let (a, la) = counter();
        let (b, lb) = counter();
        set.add(la);
        set.add(lb);

        set.fire_all(&());
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 1);
    }

    #[test]
    fn duplicate_add_is_noop() {
        let set = ListenerSet::new();
        let (hits, listener) = counter();

        assert!(set.add(Rc::clone(&listener)));
        assert!(!set.add(Rc::clone(&listener)));
        assert_eq!(set.len(), 1);

        set.fire_all(&());
        assert_eq!(hits.get(), 1, "same listener must not be delivered twice");
    }

    #[test]
    fn remove_by_identity() {
        let set = ListenerSet::new();
        let (hits, listener) = counter();
        let (_, other) = counter();

        set.add(Rc::clone(&listener));
        assert!(!set.remove(&other));
        assert!(set.remove(&listener));
        assert!(!set.remove(&listener));

        set.fire_all(&());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn registration_order() {
        let set = ListenerSet::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ['A', 'B', 'C'] {
            let log = Rc::clone(&log);
            set.add(Rc::new(move |n: &u32| log.borrow_mut().push((tag, *n))));
        }

        set.fire_all(&7);
        assert_eq!(*log.borrow(), vec![('A', 7), ('B', 7), ('C', 7)]);
    }

    #[test]
    fn listener_may_remove_itself_while_firing() {
        let set = Rc::new(ListenerSet::<()>::new());
        let hits = Rc::new(Cell::new(0u32));
        let slot: Rc<RefCell<Option<Listener<()>>>> = Rc::new(RefCell::new(None));

        let listener: Listener<()> = {
            let set = Rc::downgrade(&set);
            let hits = Rc::clone(&hits);
            let slot = Rc::clone(&slot);
            Rc::new(move |_: &()| {
                hits.set(hits.get() + 1);
                if let (Some(set), Some(me)) = (set.upgrade(), slot.borrow().as_ref()) {
                    set.remove(me);
                }
            })
        };
        *slot.borrow_mut() = Some(Rc::clone(&listener));
        set.add(listener);

        set.fire_all(&());
        set.fire_all(&());
        assert_eq!(hits.get(), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn listener_added_during_fire_waits_for_next_pass() {
        let set = Rc::new(ListenerSet::<()>::new());
        let (late_hits, late) = counter();

        let adder: Listener<()> = {
            let set = Rc::downgrade(&set);
            Rc::new(move |_: &()| {
                if let Some(set) = set.upgrade() {
                    set.add(Rc::clone(&late));
                }
            })
        };
        set.add(adder);

        set.fire_all(&());
        assert_eq!(late_hits.get(), 0);
        set.fire_all(&());
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let set = ListenerSet::new();
        let (hits, listener) = counter();
        set.add(Rc::clone(&listener));
        set.clear();
        assert!(!set.contains(&listener));
        set.fire_all(&());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn debug_format() {
        let set = ListenerSet::<()>::new();
        let dbg = format!("{set:?}");
        assert!(dbg.contains("ListenerSet"));
    }
}
