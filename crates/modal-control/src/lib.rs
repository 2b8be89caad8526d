#![forbid(unsafe_code)]

//! Modal Control public facade crate.
//!
//! Re-exports the lifecycle engine and the change-notification runtime, and
//! offers [`init`] to build a manager over a set of registered elements.
//!
//! ```
//! use modal_control::prelude::*;
//!
//! let windows = ModalWindows::builder()
//!     .register("confirm", "Are you sure?")
//!     .register("toast", "Saved")
//!     .build();
//! let modals: ModalManager<&str> = modal_control::init(windows);
//!
//! let first = modals.open("confirm", OpenOptions::new()).unwrap();
//! let second = modals.open("toast", OpenOptions::new()).unwrap();
//!
//! // The default policy queues: "toast" waits for "confirm" to close.
//! assert_eq!(modals.current_states().len(), 1);
//! modals.close(Some(first));
//! assert_eq!(modals.active_id(), Some(second));
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use modal_core::{
    AppearanceMode, CloseCapture, CloseDelayer, CloseStartGuard, ConfigError, DelayToken,
    LifecycleHooks, LifecyclePolicy, LifecycleState, ModalConfig, ModalError, ModalHandle,
    ModalId, ModalInstance, ModalKey, ModalManager, ModalState, ModalStates, ModalWindows,
    ModalWindowsBuilder, OpenOptions,
};

// --- Runtime re-exports ----------------------------------------------------

pub use modal_runtime::{Listener, ListenerSet, Observable, ObservableReader, Subscription};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for modal-control apps.
#[derive(Debug)]
pub enum Error {
    /// Open/close failure from the engine.
    Modal(ModalError),
    /// Configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modal(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Modal(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ModalError> for Error {
    fn from(err: ModalError) -> Self {
        Self::Modal(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for modal-control APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Initialization -------------------------------------------------------

/// Build a manager over `windows` with the default policy
/// (`Queue { AfterClose }`).
pub fn init<E, P>(windows: ModalWindows<E>) -> ModalManager<E, P>
where
    E: Clone + 'static,
    P: Default + 'static,
{
    ModalManager::new(windows, LifecyclePolicy::default())
}

/// Build a manager over `windows` with an explicit policy.
pub fn init_with<E, P>(windows: ModalWindows<E>, policy: LifecyclePolicy) -> ModalManager<E, P>
where
    E: Clone + 'static,
    P: Default + 'static,
{
    ModalManager::new(windows, policy)
}

/// Build a manager whose policy is read from a config file.
///
/// Files ending in `.json` are parsed as JSON, anything else as TOML.
///
/// # Errors
///
/// [`Error::Config`] if the file cannot be read or parsed.
#[cfg(feature = "config")]
pub fn init_from_file<E, P>(
    windows: ModalWindows<E>,
    path: impl AsRef<std::path::Path>,
) -> Result<ModalManager<E, P>>
where
    E: Clone + 'static,
    P: Default + 'static,
{
    let path = path.as_ref();
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => ModalConfig::from_json_file(path)?,
        _ => ModalConfig::from_toml_file(path)?,
    };
    Ok(ModalManager::with_config(windows, config))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AppearanceMode, Error, LifecyclePolicy, LifecycleState, ModalHandle, ModalId,
        ModalManager, ModalWindows, OpenOptions, Result, Subscription,
    };

    pub use crate::{core, runtime};
}

pub use modal_core as core;
pub use modal_runtime as runtime;
