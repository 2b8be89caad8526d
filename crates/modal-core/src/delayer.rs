#![forbid(unsafe_code)]

//! Close-delay coordination.
//!
//! A [`CloseDelayer`] tracks the delay tokens registered against one close
//! operation. Parties that need the close to wait (an exit animation, a
//! pending save) take a token with [`CloseDelayer::add`] and hand it back
//! with [`CloseDelayer::remove`]. The close sequence calls
//! [`CloseDelayer::arm`]. Release happens exactly once, as soon as the
//! delayer is armed and no token is outstanding, whichever of the two comes
//! last.
//!
//! # Invariants
//!
//! - Release fires iff armed AND the token set is empty.
//! - Arming with no outstanding token releases inside `arm()`.
//! - Release listeners run at most once, ever. Tokens added after release
//!   have no effect.
//!
//! # Failure Modes
//!
//! - Removing an unknown or already-removed token is a no-op.
//! - Arming twice is a no-op.

use std::cell::RefCell;
use std::fmt;

use ahash::AHashSet;
use modal_runtime::{Listener, ListenerSet};
use tracing::trace;

use crate::id::DelayToken;

#[derive(Default)]
struct DelayerState {
    tokens: AHashSet<DelayToken>,
    armed: bool,
    released: bool,
}

/// Set of outstanding delay tokens guarding one close operation.
#[derive(Default)]
pub struct CloseDelayer {
    state: RefCell<DelayerState>,
    on_release: ListenerSet<()>,
}

impl fmt::Debug for CloseDelayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("CloseDelayer")
            .field("pending", &state.tokens.len())
            .field("armed", &state.armed)
            .field("released", &state.released)
            .finish()
    }
}

impl CloseDelayer {
    /// Create an unarmed delayer with no tokens.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh delay token.
    pub fn add(&self) -> DelayToken {
        let token = DelayToken::next();
        self.state.borrow_mut().tokens.insert(token);
        token
    }

    /// Hand a token back.
    ///
    /// Returns `true` if this call released the delayer.
    pub fn remove(&self, token: DelayToken) -> bool {
        let should_release = {
            let mut state = self.state.borrow_mut();
            state.tokens.remove(&token);
            state.tokens.is_empty() && state.armed
        };
        should_release && self.release()
    }

    /// Mark the close as requested.
    ///
    /// Returns `true` if this call released the delayer.
    pub fn arm(&self) -> bool {
        let should_release = {
            let mut state = self.state.borrow_mut();
            if state.armed {
                return false;
            }
            state.armed = true;
            state.tokens.is_empty()
        };
        should_release && self.release()
    }

    /// Register a callback for the release.
    pub fn on_release(&self, listener: Listener<()>) -> bool {
        self.on_release.add(listener)
    }

    /// Unregister a release callback.
    pub fn remove_release_listener(&self, listener: &Listener<()>) -> bool {
        self.on_release.remove(listener)
    }

    /// Whether [`arm`](Self::arm) has been called.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.state.borrow().armed
    }

    /// Whether the release already happened.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.state.borrow().released
    }

    /// Number of outstanding tokens.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.borrow().tokens.len()
    }

    fn release(&self) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.released {
                return false;
            }
            state.released = true;
        }
        trace!(listeners = self.on_release.len(), "close delayer released");
        self.on_release.fire_all(&());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_listener(delayer: &CloseDelayer) -> Rc<Cell<u32>> {
        let fired = Rc::new(Cell::new(0u32));
        let fired_clone = Rc::clone(&fired);
        delayer.on_release(Rc::new(move |_: &()| fired_clone.set(fired_clone.get() + 1)));
        fired
    }

    #[test]
    fn arm_without_tokens_releases_immediately() {
        let delayer = CloseDelayer::new();
        let fired = counting_listener(&delayer);

        assert!(delayer.arm());
        assert_eq!(fired.get(), 1);
        assert!(delayer.is_released());
    }

    #[test]
    fn release_waits_for_every_token() {
        let delayer = CloseDelayer::new();
        let fired = counting_listener(&delayer);

        let t1 = delayer.add();
        let t2 = delayer.add();
        assert!(!delayer.arm());
        assert_eq!(fired.get(), 0);

        assert!(!delayer.remove(t1));
        assert_eq!(fired.get(), 0);
        assert_eq!(delayer.pending(), 1);

        assert!(delayer.remove(t2));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn tokens_removed_before_arming_do_not_release() {
        let delayer = CloseDelayer::new();
        let fired = counting_listener(&delayer);

        let t = delayer.add();
        assert!(!delayer.remove(t));
        assert_eq!(fired.get(), 0);
        assert!(!delayer.is_armed());

        assert!(delayer.arm());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn release_fires_once() {
        let delayer = CloseDelayer::new();
        let fired = counting_listener(&delayer);

        let t = delayer.add();
        delayer.arm();
        assert!(delayer.remove(t));
        assert!(!delayer.remove(t));
        assert!(!delayer.arm());

        let late = delayer.add();
        assert!(!delayer.remove(late));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn unknown_token_is_noop_before_release() {
        let other = CloseDelayer::new();
        let foreign = other.add();

        let delayer = CloseDelayer::new();
        let fired = counting_listener(&delayer);
        let mine = delayer.add();
        delayer.arm();

        assert!(!delayer.remove(foreign));
        assert_eq!(fired.get(), 0);
        assert!(delayer.remove(mine));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn removed_release_listener_is_not_called() {
        let delayer = CloseDelayer::new();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = Rc::clone(&fired);
        let listener: Listener<()> = Rc::new(move |_: &()| fired_clone.set(true));

        assert!(delayer.on_release(Rc::clone(&listener)));
        assert!(delayer.remove_release_listener(&listener));
        delayer.arm();
        assert!(!fired.get());
        assert!(delayer.is_released());
    }

    #[test]
    fn debug_format() {
        let delayer = CloseDelayer::new();
        delayer.add();
        let dbg = format!("{delayer:?}");
        assert!(dbg.contains("pending: 1"));
        assert!(dbg.contains("armed: false"));
    }
}
