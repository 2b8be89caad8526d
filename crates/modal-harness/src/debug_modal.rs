#![forbid(unsafe_code)]

//! Reference modal element and a text renderer for it.
//!
//! [`DebugModal`] renders the state a real element would read from its
//! [`ModalHandle`], one `Label-value` line per field:
//!
//! ```text
//! Id-3
//! IsActive-true
//! IsClosing-false
//! LifecycleState-OPENED
//! Count-first-modal
//! ```
//!
//! [`DebugApp`] plays the role of a UI tree: it mounts one element per
//! visible entry, holds a [`CloseCapture`] for elements opened with
//! `hold_close`, and lets tests "click" close and release buttons by
//! identifier.

use std::cell::RefCell;
use std::fmt;

use modal_core::{
    CloseCapture, LifecyclePolicy, ModalHandle, ModalId, ModalManager, ModalWindows, Result,
};

/// Key the debug element is registered under by [`debug_windows`].
pub const DEBUG_KEY: &str = "debug";

/// Reference element that prints its own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebugModal;

/// Open-time props for [`DebugModal`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DebugProps {
    /// Text shown on the `Count-` line and used to address the element.
    pub identifier: String,
    /// Hold a close capture while mounted, released by
    /// [`DebugApp::release`].
    pub hold_close: bool,
}

impl DebugProps {
    /// Props with the given identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            hold_close: false,
        }
    }

    /// Hold the close until released.
    #[must_use]
    pub fn hold_close(mut self) -> Self {
        self.hold_close = true;
        self
    }
}

/// Manager type driven by the debug fixtures.
pub type DebugManager = ModalManager<DebugModal, DebugProps>;

/// Handle type passed to [`DebugModal::render`].
pub type DebugHandle = ModalHandle<DebugModal, DebugProps>;

impl DebugModal {
    /// Render one element.
    pub fn render(&self, handle: &DebugHandle) -> String {
        DebugView { handle }.to_string()
    }
}

/// Text view of one mounted [`DebugModal`].
struct DebugView<'a> {
    handle: &'a DebugHandle,
}

impl fmt::Display for DebugView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handle = self.handle;
        writeln!(f, "Id-{}", handle.id())?;
        writeln!(f, "IsActive-{}", handle.is_active())?;
        writeln!(f, "IsClosing-{}", handle.is_closing())?;
        writeln!(f, "LifecycleState-{}", handle.lifecycle_state())?;
        writeln!(f, "Count-{}", handle.props().identifier)
    }
}

/// Registration map with [`DebugModal`] under [`DEBUG_KEY`].
pub fn debug_windows() -> ModalWindows<DebugModal> {
    ModalWindows::builder().register(DEBUG_KEY, DebugModal).build()
}

/// Manager over [`debug_windows`].
pub fn debug_manager(policy: LifecyclePolicy) -> DebugManager {
    ModalManager::new(debug_windows(), policy)
}

/// Render every visible element, bottom to top, separated by blank lines.
pub fn render_visible(manager: &DebugManager) -> String {
    manager
        .visible_handles()
        .iter()
        .map(|handle| handle.element().render(handle))
        .collect::<Vec<_>>()
        .join("\n")
}

struct Mounted {
    handle: DebugHandle,
    capture: Option<CloseCapture<DebugModal, DebugProps>>,
}

/// Minimal stand-in for a UI tree over a [`DebugManager`].
pub struct DebugApp {
    manager: DebugManager,
    mounted: RefCell<Vec<Mounted>>,
}

impl fmt::Debug for DebugApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugApp")
            .field("manager", &self.manager)
            .field("mounted", &self.mounted.borrow().len())
            .finish()
    }
}

impl DebugApp {
    /// App over a fresh manager with `policy`.
    pub fn new(policy: LifecyclePolicy) -> Self {
        Self {
            manager: debug_manager(policy),
            mounted: RefCell::new(Vec::new()),
        }
    }

    /// The driven manager.
    pub fn manager(&self) -> &DebugManager {
        &self.manager
    }

    /// Open a debug element and mount whatever became visible.
    ///
    /// # Errors
    ///
    /// Propagates the manager's error; never fails for [`DEBUG_KEY`].
    pub fn open(&self, props: DebugProps) -> Result<ModalId> {
        let id = self.manager.open_with(DEBUG_KEY, props)?;
        self.sync();
        Ok(id)
    }

    /// Mount newly visible elements and unmount the ones that left.
    pub fn sync(&self) {
        let visible = self.manager.visible_handles();
        let removed = {
            let mut mounted = self.mounted.borrow_mut();
            let mut previous = std::mem::take(&mut *mounted);
            for handle in visible {
                match previous.iter().position(|m| m.handle.id() == handle.id()) {
                    Some(index) => mounted.push(previous.swap_remove(index)),
                    None => {
                        let capture = handle.props().hold_close.then(|| handle.capture());
                        mounted.push(Mounted { handle, capture });
                    }
                }
            }
            previous
        };
        drop(removed);
    }

    /// Render mounted elements after syncing.
    pub fn render(&self) -> String {
        self.sync();
        self.mounted
            .borrow()
            .iter()
            .map(|m| m.handle.element().render(&m.handle))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether an element with `identifier` is mounted.
    pub fn is_mounted(&self, identifier: &str) -> bool {
        self.sync();
        self.find(identifier).is_some()
    }

    /// Press the close button of the element with `identifier`.
    ///
    /// Returns `false` if no such element is mounted.
    pub fn click_close(&self, identifier: &str) -> bool {
        self.sync();
        let Some(handle) = self.find(identifier) else {
            return false;
        };
        let closed = handle.close_self().is_ok();
        self.sync();
        closed
    }

    /// Release the close capture of the element with `identifier`.
    ///
    /// Returns `false` if no such element holds a capture.
    pub fn release(&self, identifier: &str) -> bool {
        self.sync();
        let capture = self
            .mounted
            .borrow_mut()
            .iter_mut()
            .find(|m| m.handle.props().identifier == identifier)
            .and_then(|m| m.capture.take());
        let Some(mut capture) = capture else {
            return false;
        };
        capture.release();
        self.sync();
        true
    }

    fn find(&self, identifier: &str) -> Option<DebugHandle> {
        self.mounted
            .borrow()
            .iter()
            .find(|m| m.handle.props().identifier == identifier)
            .map(|m| m.handle.clone())
    }
}
