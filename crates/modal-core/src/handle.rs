#![forbid(unsafe_code)]

//! Capability handed to a rendered modal element.
//!
//! A [`ModalHandle`] lets an element read its own state, ask to be closed,
//! and postpone its own close while an exit animation runs. It holds the
//! instance strongly and the manager weakly, so a handle that outlives its
//! manager still reads state but can no longer close.
//!
//! [`CloseCapture`] is the RAII form of a delay token: it holds one token
//! from creation until [`CloseCapture::release`] or drop.

use std::fmt;
use std::rc::{Rc, Weak};

use modal_runtime::Listener;

use crate::error::{ModalError, Result};
use crate::id::{DelayToken, ModalId};
use crate::instance::ModalInstance;
use crate::lifecycle::LifecycleState;
use crate::manager::ManagerInner;
use crate::windows::ModalKey;

/// Per-instance capability for a rendered element.
pub struct ModalHandle<E, P = ()> {
    instance: Rc<ModalInstance<E, P>>,
    manager: Weak<ManagerInner<E, P>>,
}

impl<E, P> Clone for ModalHandle<E, P> {
    fn clone(&self) -> Self {
        Self {
            instance: Rc::clone(&self.instance),
            manager: Weak::clone(&self.manager),
        }
    }
}

impl<E, P> fmt::Debug for ModalHandle<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalHandle")
            .field("id", &self.instance.id())
            .field("key", self.instance.key())
            .field("state", &self.instance.lifecycle_state())
            .field("attached", &(self.manager.strong_count() > 0))
            .finish()
    }
}

impl<E, P> ModalHandle<E, P> {
    pub(crate) fn new(instance: Rc<ModalInstance<E, P>>, manager: Weak<ManagerInner<E, P>>) -> Self {
        Self { instance, manager }
    }

    /// Instance identity.
    pub fn id(&self) -> ModalId {
        self.instance.id()
    }

    /// Registration key.
    pub fn key(&self) -> &ModalKey {
        self.instance.key()
    }

    /// The registered element.
    pub fn element(&self) -> &E {
        self.instance.element()
    }

    /// Open-time props.
    pub fn props(&self) -> &Rc<P> {
        self.instance.props()
    }

    /// Live lifecycle state.
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.instance.lifecycle_state()
    }

    /// Whether the close sequence has started and not yet finished.
    pub fn is_closing(&self) -> bool {
        self.instance.lifecycle_state() == LifecycleState::Closing
    }

    /// Take a delay token.
    pub fn add_close_delayer(&self) -> DelayToken {
        self.instance.add_close_delayer()
    }

    /// Hand back a delay token.
    pub fn remove_close_delayer(&self, token: DelayToken) {
        self.instance.remove_close_delayer(token);
    }

    /// Hold the close open until the returned capture is released or
    /// dropped.
    pub fn capture(&self) -> CloseCapture<E, P> {
        CloseCapture {
            token: Some(self.instance.add_close_delayer()),
            instance: Rc::clone(&self.instance),
        }
    }

    /// Register `f` for the start of the close sequence until the returned
    /// guard is dropped.
    pub fn on_close_start(&self, f: impl Fn() + 'static) -> CloseStartGuard<E, P> {
        let listener: Listener<()> = Rc::new(move |_: &()| f());
        self.instance.add_close_start_listener(Rc::clone(&listener));
        CloseStartGuard {
            listener,
            instance: Rc::clone(&self.instance),
        }
    }

    /// Register a close-start listener directly.
    pub fn add_close_start_listener(&self, listener: Listener<()>) -> bool {
        self.instance.add_close_start_listener(listener)
    }

    /// Unregister a close-start listener.
    pub fn remove_close_start_listener(&self, listener: &Listener<()>) -> bool {
        self.instance.remove_close_start_listener(listener)
    }

    /// The underlying instance.
    pub fn instance(&self) -> &Rc<ModalInstance<E, P>> {
        &self.instance
    }
}

impl<E: Clone + 'static, P: Default + 'static> ModalHandle<E, P> {
    /// Whether this instance is the topmost published entry.
    pub fn is_active(&self) -> bool {
        self.manager
            .upgrade()
            .is_some_and(|manager| manager.active_id() == Some(self.instance.id()))
    }

    /// Ask the owning manager to close this instance.
    ///
    /// # Errors
    ///
    /// [`ModalError::Detached`] if the manager no longer exists.
    pub fn close_self(&self) -> Result<()> {
        let manager = self.manager.upgrade().ok_or(ModalError::Detached {
            id: self.instance.id(),
        })?;
        manager.close(Some(self.instance.id()));
        Ok(())
    }
}

/// Delay token released on [`release`](Self::release) or drop.
#[must_use = "dropping a CloseCapture releases it immediately"]
pub struct CloseCapture<E, P = ()> {
    token: Option<DelayToken>,
    instance: Rc<ModalInstance<E, P>>,
}

impl<E, P> CloseCapture<E, P> {
    /// Hand the token back. Later calls are no-ops.
    pub fn release(&mut self) {
        if let Some(token) = self.token.take() {
            self.instance.remove_close_delayer(token);
        }
    }

    /// Whether the token is still held.
    pub fn is_held(&self) -> bool {
        self.token.is_some()
    }
}

impl<E, P> Drop for CloseCapture<E, P> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<E, P> fmt::Debug for CloseCapture<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseCapture")
            .field("id", &self.instance.id())
            .field("held", &self.token.is_some())
            .finish()
    }
}

/// Close-start listener registration, removed on drop.
#[must_use = "dropping a CloseStartGuard unregisters the listener"]
pub struct CloseStartGuard<E, P = ()> {
    listener: Listener<()>,
    instance: Rc<ModalInstance<E, P>>,
}

impl<E, P> Drop for CloseStartGuard<E, P> {
    fn drop(&mut self) {
        self.instance.remove_close_start_listener(&self.listener);
    }
}

impl<E, P> fmt::Debug for CloseStartGuard<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseStartGuard")
            .field("id", &self.instance.id())
            .finish()
    }
}
