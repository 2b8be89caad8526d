#![forbid(unsafe_code)]

//! Recorder for every list a manager publishes.
//!
//! Attach a [`StateRecorder`] before driving a manager, then assert on the
//! sequence of published lists. The lifecycle states inside each entry are
//! the values captured at publication time, which is what a renderer sees.

use std::cell::RefCell;
use std::rc::Rc;

use modal_core::{LifecycleState, ModalId, ModalStates};
use modal_runtime::{ObservableReader, Subscription};
use serde_json::json;

/// One published entry, reduced to identity and state.
pub type Frame = Vec<(ModalId, LifecycleState)>;

/// Records every list published through an [`ObservableReader`].
pub struct StateRecorder<E, P = ()> {
    snapshots: Rc<RefCell<Vec<ModalStates<E, P>>>>,
    _subscription: Subscription,
}

impl<E: Clone + 'static, P: 'static> StateRecorder<E, P> {
    /// Start recording. The current list is not recorded, only changes.
    pub fn attach(reader: &ObservableReader<ModalStates<E, P>>) -> Self {
        let snapshots: Rc<RefCell<Vec<ModalStates<E, P>>>> = Rc::default();
        let sink = Rc::clone(&snapshots);
        let subscription = reader.subscribe(move |states: &ModalStates<E, P>| {
            sink.borrow_mut().push(Rc::clone(states));
        });
        Self {
            snapshots,
            _subscription: subscription,
        }
    }
}

impl<E, P> StateRecorder<E, P> {
    /// Every recorded list, oldest first.
    pub fn snapshots(&self) -> Vec<ModalStates<E, P>> {
        self.snapshots.borrow().iter().map(Rc::clone).collect()
    }

    /// Number of recorded publications.
    pub fn len(&self) -> usize {
        self.snapshots.borrow().len()
    }

    /// Whether nothing was published yet.
    pub fn is_empty(&self) -> bool {
        self.snapshots.borrow().is_empty()
    }

    /// Most recent publication.
    pub fn last(&self) -> Option<ModalStates<E, P>> {
        self.snapshots.borrow().last().map(Rc::clone)
    }

    /// Recorded lists reduced to `(id, state)` pairs.
    pub fn frames(&self) -> Vec<Frame> {
        self.snapshots
            .borrow()
            .iter()
            .map(|states| states.iter().map(|s| (s.id, s.lifecycle_state)).collect())
            .collect()
    }

    /// Largest number of Opened entries seen in any single publication.
    pub fn max_opened(&self) -> usize {
        self.snapshots
            .borrow()
            .iter()
            .map(|states| {
                states
                    .iter()
                    .filter(|s| s.lifecycle_state == LifecycleState::Opened)
                    .count()
            })
            .max()
            .unwrap_or(0)
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.snapshots.borrow_mut().clear();
    }

    /// One JSON object per publication, newline separated.
    pub fn to_jsonl(&self) -> String {
        let snapshots = self.snapshots.borrow();
        let mut out = String::new();
        for (seq, states) in snapshots.iter().enumerate() {
            let entries: Vec<_> = states
                .iter()
                .map(|s| {
                    json!({
                        "id": s.id.get(),
                        "key": s.key.as_str(),
                        "state": s.lifecycle_state.as_str(),
                    })
                })
                .collect();
            let line = json!({ "seq": seq, "visible": entries });
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }
}

impl<E, P> std::fmt::Debug for StateRecorder<E, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateRecorder")
            .field("recorded", &self.snapshots.borrow().len())
            .finish()
    }
}
