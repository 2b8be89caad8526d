#![forbid(unsafe_code)]

//! A single modal occurrence and its lifecycle state machine.
//!
//! # State Machine
//!
//! ```text
//! Pending ──open()──▶ Opened ──start_close()──▶ Closing ──release──▶ Closed
//! ```
//!
//! Every transition method is a no-op outside its source state. Hooks fire
//! after the state has changed, so a hook that reads the instance sees the
//! new state.
//!
//! # Close Sequence
//!
//! `start_close()` moves to Closing, fires `on_close_start`, then every
//! close-start listener, then arms the [`CloseDelayer`]. The delayer's
//! release drives `end_close()`, whichever path releases it: arming with no
//! outstanding token, removing the last token through the instance, or
//! calling the delayer directly.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use modal_runtime::{Listener, ListenerSet};
use tracing::trace;

use crate::delayer::CloseDelayer;
use crate::id::{DelayToken, ModalId};
use crate::lifecycle::LifecycleState;
use crate::windows::ModalKey;

/// Callback invoked at a lifecycle transition.
pub type Hook<E, P> = Box<dyn Fn(&ModalInstance<E, P>)>;

/// Optional callbacks fired at each lifecycle transition.
///
/// Supplied once at construction. Each fires at most once per instance.
pub struct LifecycleHooks<E, P = ()> {
    on_open: Option<Hook<E, P>>,
    on_close_start: Option<Hook<E, P>>,
    on_closed: Option<Hook<E, P>>,
}

impl<E, P> Default for LifecycleHooks<E, P> {
    fn default() -> Self {
        Self {
            on_open: None,
            on_close_start: None,
            on_closed: None,
        }
    }
}

impl<E, P> fmt::Debug for LifecycleHooks<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("on_open", &self.on_open.is_some())
            .field("on_close_start", &self.on_close_start.is_some())
            .field("on_closed", &self.on_closed.is_some())
            .finish()
    }
}

impl<E, P> LifecycleHooks<E, P> {
    /// No hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired on Pending → Opened.
    #[must_use]
    pub fn on_open(mut self, f: impl Fn(&ModalInstance<E, P>) + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    /// Fired on Opened → Closing.
    #[must_use]
    pub fn on_close_start(mut self, f: impl Fn(&ModalInstance<E, P>) + 'static) -> Self {
        self.on_close_start = Some(Box::new(f));
        self
    }

    /// Fired on the transition to Closed.
    #[must_use]
    pub fn on_closed(mut self, f: impl Fn(&ModalInstance<E, P>) + 'static) -> Self {
        self.on_closed = Some(Box::new(f));
        self
    }
}

/// Per-open options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions<P = ()> {
    /// Parameters for this occurrence. `P::default()` when absent.
    pub props: Option<P>,
}

impl<P> Default for OpenOptions<P> {
    fn default() -> Self {
        Self { props: None }
    }
}

impl<P> OpenOptions<P> {
    /// Options with no props.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the props.
    #[must_use]
    pub fn props(mut self, props: P) -> Self {
        self.props = Some(props);
        self
    }
}

/// Immutable snapshot of one instance, as published to renderers.
pub struct ModalState<E, P = ()> {
    /// Instance identity.
    pub id: ModalId,
    /// Registration key the element came from.
    pub key: ModalKey,
    /// The registered element.
    pub element: E,
    /// Open-time props.
    pub props: Rc<P>,
    /// State at the time of the snapshot.
    pub lifecycle_state: LifecycleState,
}

impl<E: Clone, P> Clone for ModalState<E, P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            key: self.key.clone(),
            element: self.element.clone(),
            props: Rc::clone(&self.props),
            lifecycle_state: self.lifecycle_state,
        }
    }
}

impl<E: fmt::Debug, P: fmt::Debug> fmt::Debug for ModalState<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalState")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("element", &self.element)
            .field("props", &self.props)
            .field("lifecycle_state", &self.lifecycle_state)
            .finish()
    }
}

/// One live modal occurrence.
pub struct ModalInstance<E, P = ()> {
    id: ModalId,
    key: ModalKey,
    element: E,
    props: Rc<P>,
    state: Cell<LifecycleState>,
    delayer: CloseDelayer,
    close_start: ListenerSet<()>,
    hooks: LifecycleHooks<E, P>,
}

impl<E: fmt::Debug, P: fmt::Debug> fmt::Debug for ModalInstance<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalInstance")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("element", &self.element)
            .field("props", &self.props)
            .field("state", &self.state.get())
            .field("delayer", &self.delayer)
            .finish_non_exhaustive()
    }
}

impl<E: 'static, P: Default + 'static> ModalInstance<E, P> {
    /// Create an instance in the Pending state.
    ///
    /// The instance subscribes to its own delayer's release, so it is
    /// handed out behind an `Rc`.
    pub fn new(
        id: ModalId,
        key: ModalKey,
        element: E,
        options: OpenOptions<P>,
        hooks: LifecycleHooks<E, P>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let delayer = CloseDelayer::new();
            let weak = weak.clone();
            delayer.on_release(Rc::new(move |_: &()| {
                if let Some(instance) = weak.upgrade() {
                    instance.end_close();
                }
            }));
            Self {
                id,
                key,
                element,
                props: Rc::new(options.props.unwrap_or_default()),
                state: Cell::new(LifecycleState::Pending),
                delayer,
                close_start: ListenerSet::new(),
                hooks,
            }
        })
    }
}

impl<E, P> ModalInstance<E, P> {
    /// Instance identity.
    #[inline]
    pub fn id(&self) -> ModalId {
        self.id
    }

    /// Registration key.
    #[inline]
    pub fn key(&self) -> &ModalKey {
        &self.key
    }

    /// The registered element.
    #[inline]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Open-time props.
    #[inline]
    pub fn props(&self) -> &Rc<P> {
        &self.props
    }

    /// Current lifecycle state.
    #[inline]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.state.get()
    }

    /// The close delayer guarding this instance's close. Releasing it by
    /// any route ends the close.
    pub fn close_delayer(&self) -> &CloseDelayer {
        &self.delayer
    }

    /// Pending → Opened. Fires `on_open`.
    pub fn open(&self) {
        if !self.transition(LifecycleState::Pending, LifecycleState::Opened) {
            return;
        }
        if let Some(hook) = &self.hooks.on_open {
            hook(self);
        }
    }

    /// Opened → Closing. Fires `on_close_start`, then close-start
    /// listeners, then arms the close delayer.
    pub fn start_close(&self) {
        if !self.transition(LifecycleState::Opened, LifecycleState::Closing) {
            return;
        }
        if let Some(hook) = &self.hooks.on_close_start {
            hook(self);
        }
        self.close_start.fire_all(&());
        self.delayer.arm();
    }

    /// Any non-terminal state → Closed. Fires `on_closed`.
    pub fn end_close(&self) {
        let from = self.state.get();
        if from.is_terminal() {
            return;
        }
        self.state.set(LifecycleState::Closed);
        trace!(id = %self.id, key = %self.key, from = %from, to = "CLOSED", "modal transition");
        if let Some(hook) = &self.hooks.on_closed {
            hook(self);
        }
    }

    /// Take a delay token that postpones Closed until it is removed.
    pub fn add_close_delayer(&self) -> DelayToken {
        self.delayer.add()
    }

    /// Hand back a delay token. Drives the instance to Closed if this was
    /// the last token of an armed close.
    pub fn remove_close_delayer(&self, token: DelayToken) {
        self.delayer.remove(token);
    }

    /// Register a callback for the start of the close sequence.
    pub fn add_close_start_listener(&self, listener: Listener<()>) -> bool {
        self.close_start.add(listener)
    }

    /// Unregister a close-start callback.
    pub fn remove_close_start_listener(&self, listener: &Listener<()>) -> bool {
        self.close_start.remove(listener)
    }

    fn transition(&self, from: LifecycleState, to: LifecycleState) -> bool {
        if self.state.get() != from {
            return false;
        }
        self.state.set(to);
        trace!(id = %self.id, key = %self.key, from = %from, to = %to, "modal transition");
        true
    }
}

impl<E: Clone, P> ModalInstance<E, P> {
    /// Snapshot of identity, element, props, and current state.
    pub fn to_state(&self) -> ModalState<E, P> {
        ModalState {
            id: self.id,
            key: self.key.clone(),
            element: self.element.clone(),
            props: Rc::clone(&self.props),
            lifecycle_state: self.state.get(),
        }
    }
}
