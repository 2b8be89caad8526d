#![forbid(unsafe_code)]

//! Modal manager: registry of live instances, admission policy, and the
//! published list of visible modal states.
//!
//! # Admission
//!
//! | Policy                 | Opens immediately when          | Queue advances on |
//! |------------------------|---------------------------------|-------------------|
//! | `Multiple`             | always                          | never             |
//! | `Queue { AfterClose }` | it is the only tracked instance | Closed            |
//! | `Queue { DuringClose }`| it is the only tracked instance | Closing           |
//!
//! Advancing the queue opens the first Pending instance in request order.
//!
//! # Published list
//!
//! The manager owns an [`Observable`] holding an `Rc<[ModalState]>`. An
//! entry is appended when an instance opens, replaced when it starts
//! closing, and removed when it is closed. The last entry is the topmost
//! modal. Renderers subscribe through [`ModalManager::states`].
//!
//! # Re-entrancy
//!
//! Instance hooks call back into the manager through a `Weak` reference.
//! No `RefCell` borrow is held while an instance transition, hook, or
//! subscriber runs, so subscribers may call `open`/`close` freely.
//!
//! # Example
//!
//! ```
//! use modal_core::{LifecyclePolicy, ModalManager, ModalWindows, OpenOptions};
//!
//! let windows = ModalWindows::builder().register("confirm", "Confirm?").build();
//! let manager: ModalManager<&str> = ModalManager::new(windows, LifecyclePolicy::Multiple);
//!
//! let id = manager.open("confirm", OpenOptions::new()).unwrap();
//! assert_eq!(manager.current_states().len(), 1);
//!
//! manager.close(Some(id));
//! assert!(manager.current_states().is_empty());
//! assert!(manager.get_instance_by_id(id).is_none());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use modal_runtime::{Observable, ObservableReader};
use tracing::{debug, trace, warn};

use crate::config::{LifecyclePolicy, ModalConfig};
use crate::error::{ModalError, Result};
use crate::handle::ModalHandle;
use crate::id::ModalId;
use crate::instance::{LifecycleHooks, ModalInstance, ModalState, OpenOptions};
use crate::lifecycle::LifecycleState;
use crate::windows::{ModalKey, ModalWindows};

/// Ordered list of visible modal states. The last entry is topmost.
pub type ModalStates<E, P = ()> = Rc<[ModalState<E, P>]>;

pub(crate) struct ManagerInner<E, P> {
    windows: ModalWindows<E>,
    policy: LifecyclePolicy,
    instances: RefCell<Vec<Rc<ModalInstance<E, P>>>>,
    states: Observable<ModalStates<E, P>>,
}

impl<E: Clone + 'static, P: Default + 'static> ManagerInner<E, P> {
    fn hooks(weak: &Weak<Self>) -> LifecycleHooks<E, P> {
        let on_open = weak.clone();
        let on_close_start = weak.clone();
        let on_closed = weak.clone();
        LifecycleHooks::new()
            .on_open(move |instance| {
                if let Some(inner) = on_open.upgrade() {
                    inner.publish_opened(instance);
                }
            })
            .on_close_start(move |instance| {
                if let Some(inner) = on_close_start.upgrade() {
                    inner.publish_close_start(instance);
                }
            })
            .on_closed(move |instance| {
                if let Some(inner) = on_closed.upgrade() {
                    inner.finish_closed(instance);
                }
            })
    }

    fn open(self: &Rc<Self>, key: &str, options: OpenOptions<P>) -> Result<ModalId> {
        let Some((key, element)) = self.windows.get_key_value(key) else {
            warn!(key, policy = %self.policy, "open requested for unregistered modal key");
            return Err(ModalError::UnknownKey(ModalKey::from(key)));
        };

        let id = ModalId::next();
        let instance = ModalInstance::new(
            id,
            key.clone(),
            element.clone(),
            options,
            Self::hooks(&Rc::downgrade(self)),
        );

        let admit = {
            let mut instances = self.instances.borrow_mut();
            instances.push(Rc::clone(&instance));
            !self.policy.is_queue() || instances.len() == 1
        };

        debug!(id = %id, key = %key, policy = %self.policy, admitted = admit, "modal open requested");
        if admit {
            instance.open();
        }
        Ok(id)
    }

    pub(crate) fn close(&self, target: Option<ModalId>) {
        let instance = match target {
            Some(id) => self.get_instance_by_id(id),
            None => self.topmost_opened(),
        };
        let Some(instance) = instance else {
            trace!(id = ?target.map(ModalId::get), "close requested for untracked modal");
            return;
        };
        debug!(
            id = %instance.id(),
            key = %instance.key(),
            state = %instance.lifecycle_state(),
            "modal close requested"
        );
        instance.start_close();
    }

    fn topmost_opened(&self) -> Option<Rc<ModalInstance<E, P>>> {
        let ids: Vec<ModalId> = self
            .states
            .with(|states| states.iter().rev().map(|state| state.id).collect());
        ids.into_iter()
            .filter_map(|id| self.get_instance_by_id(id))
            .find(|instance| instance.lifecycle_state() == LifecycleState::Opened)
    }

    pub(crate) fn get_instance_by_id(&self, id: ModalId) -> Option<Rc<ModalInstance<E, P>>> {
        self.instances
            .borrow()
            .iter()
            .find(|instance| instance.id() == id)
            .cloned()
    }

    pub(crate) fn active_id(&self) -> Option<ModalId> {
        self.states.with(|states| states.last().map(|state| state.id))
    }

    fn publish_opened(&self, instance: &ModalInstance<E, P>) {
        debug!(id = %instance.id(), key = %instance.key(), policy = %self.policy, "modal opened");
        let snapshot = instance.to_state();
        self.replace_states(|states| {
            let mut next = states.to_vec();
            next.push(snapshot);
            next
        });
    }

    fn publish_close_start(&self, instance: &ModalInstance<E, P>) {
        debug!(id = %instance.id(), key = %instance.key(), policy = %self.policy, "modal close started");
        let snapshot = instance.to_state();
        self.replace_states(|states| {
            states
                .iter()
                .map(|state| {
                    if state.id == snapshot.id {
                        snapshot.clone()
                    } else {
                        state.clone()
                    }
                })
                .collect()
        });
        if self.policy.advances_on_close_start() {
            self.advance_queue();
        }
    }

    fn finish_closed(&self, instance: &ModalInstance<E, P>) {
        let id = instance.id();
        debug!(id = %id, key = %instance.key(), policy = %self.policy, "modal closed");
        self.replace_states(|states| {
            states
                .iter()
                .filter(|state| state.id != id)
                .cloned()
                .collect()
        });
        self.instances.borrow_mut().retain(|tracked| tracked.id() != id);
        if self.policy.advances_on_closed() {
            self.advance_queue();
        }
    }

    fn advance_queue(&self) {
        let next = self
            .instances
            .borrow()
            .iter()
            .find(|instance| instance.lifecycle_state() == LifecycleState::Pending)
            .cloned();
        match next {
            Some(next) => {
                debug!(id = %next.id(), key = %next.key(), policy = %self.policy, "queue advanced");
                next.open();
            }
            None => trace!(policy = %self.policy, "queue empty"),
        }
    }

    fn replace_states(&self, f: impl FnOnce(&[ModalState<E, P>]) -> Vec<ModalState<E, P>>) {
        let next: ModalStates<E, P> = self.states.with(|states| f(states)).into();
        self.states.set(next);
    }
}

/// Owner of every live modal instance.
///
/// Cloning a manager yields another reference to the same registry.
pub struct ModalManager<E, P = ()> {
    inner: Rc<ManagerInner<E, P>>,
}

impl<E, P> Clone for ModalManager<E, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E, P> fmt::Debug for ModalManager<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalManager")
            .field("policy", &self.inner.policy)
            .field("registered", &self.inner.windows.len())
            .field("tracked", &self.inner.instances.borrow().len())
            .finish()
    }
}

impl<E: Clone + 'static, P: Default + 'static> ModalManager<E, P> {
    /// Create a manager over `windows` with a fixed admission policy.
    pub fn new(windows: ModalWindows<E>, policy: LifecyclePolicy) -> Self {
        let empty: ModalStates<E, P> = Rc::from(Vec::new());
        debug!(policy = %policy, registered = windows.len(), "modal manager created");
        Self {
            inner: Rc::new(ManagerInner {
                windows,
                policy,
                instances: RefCell::new(Vec::new()),
                states: Observable::new(empty),
            }),
        }
    }

    /// Create a manager from a loaded configuration.
    pub fn with_config(windows: ModalWindows<E>, config: ModalConfig) -> Self {
        Self::new(windows, config.lifecycle)
    }

    /// Open a new instance of the element registered under `key`.
    ///
    /// Returns the new instance's id. Under a queue policy the instance may
    /// stay Pending until the queue advances.
    ///
    /// # Errors
    ///
    /// [`ModalError::UnknownKey`] if nothing is registered under `key`. No
    /// instance is created in that case.
    pub fn open(&self, key: impl AsRef<str>, options: OpenOptions<P>) -> Result<ModalId> {
        self.inner.open(key.as_ref(), options)
    }

    /// Open with props. Shorthand for `open(key, OpenOptions::new().props(props))`.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn open_with(&self, key: impl AsRef<str>, props: P) -> Result<ModalId> {
        self.open(key, OpenOptions::new().props(props))
    }

    /// Start closing an instance.
    ///
    /// `Some(id)` targets that instance; an untracked id is ignored. `None`
    /// targets the topmost visible instance that is still Opened, and is a
    /// no-op when there is none.
    pub fn close(&self, id: Option<ModalId>) {
        self.inner.close(id);
    }

    /// Look up a tracked instance. Closed instances are no longer tracked.
    pub fn get_instance_by_id(&self, id: ModalId) -> Option<Rc<ModalInstance<E, P>>> {
        self.inner.get_instance_by_id(id)
    }

    /// Capability handle for a tracked instance.
    pub fn handle(&self, id: ModalId) -> Option<ModalHandle<E, P>> {
        self.get_instance_by_id(id)
            .map(|instance| ModalHandle::new(instance, Rc::downgrade(&self.inner)))
    }

    /// One handle per published entry, bottom to top.
    pub fn visible_handles(&self) -> Vec<ModalHandle<E, P>> {
        self.current_states()
            .iter()
            .filter_map(|state| self.handle(state.id))
            .collect()
    }

    /// Read/subscribe view of the published list.
    pub fn states(&self) -> ObservableReader<ModalStates<E, P>> {
        self.inner.states.reader()
    }

    /// Current published list.
    pub fn current_states(&self) -> ModalStates<E, P> {
        self.inner.states.get()
    }

    /// Id of the topmost published instance.
    pub fn active_id(&self) -> Option<ModalId> {
        self.inner.active_id()
    }

    /// Admission policy.
    pub fn policy(&self) -> LifecyclePolicy {
        self.inner.policy
    }

    /// Registered elements.
    pub fn windows(&self) -> &ModalWindows<E> {
        &self.inner.windows
    }

    /// Number of tracked (not yet Closed) instances.
    pub fn len(&self) -> usize {
        self.inner.instances.borrow().len()
    }

    /// Whether no instance is tracked.
    pub fn is_empty(&self) -> bool {
        self.inner.instances.borrow().is_empty()
    }
}
