#![forbid(unsafe_code)]

//! Modal lifecycle engine.
//!
//! Tracks overlay ("modal") instances from the moment they are requested to
//! the moment their close is complete, decides which of them may be visible
//! at once, and publishes the ordered list of visible states for a renderer.
//!
//! # Key Components
//!
//! - [`ModalManager`] - Registry of live instances and admission policy
//! - [`ModalInstance`] - Four-state lifecycle machine with hooks
//! - [`CloseDelayer`] - Delay tokens that postpone a close until released
//! - [`ModalHandle`] - Capability handed to a rendered element
//! - [`LifecyclePolicy`] - `Multiple` stacking or single-file `Queue`
//!
//! # Threading
//!
//! Everything here is single-threaded (`Rc`/`RefCell`). Hooks and
//! subscribers run synchronously on the calling thread and may re-enter
//! the manager.

pub mod config;
pub mod delayer;
pub mod error;
pub mod handle;
pub mod id;
pub mod instance;
pub mod lifecycle;
pub mod manager;
pub mod windows;

pub use config::{AppearanceMode, ConfigError, LifecyclePolicy, ModalConfig};
pub use delayer::CloseDelayer;
pub use error::{ModalError, Result};
pub use handle::{CloseCapture, CloseStartGuard, ModalHandle};
pub use id::{DelayToken, ModalId};
pub use instance::{Hook, LifecycleHooks, ModalInstance, ModalState, OpenOptions};
pub use lifecycle::LifecycleState;
pub use manager::{ModalManager, ModalStates};
pub use windows::{ModalKey, ModalWindows, ModalWindowsBuilder};
