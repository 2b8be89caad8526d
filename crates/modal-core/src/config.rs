#![forbid(unsafe_code)]

//! Lifecycle policy configuration.
//!
//! The policy decides how many instances may be open at once and, in queue
//! mode, when the next pending instance is admitted. It is fixed for the
//! lifetime of a manager.
//!
//! # Loading
//!
//! ```toml
//! # modal.toml
//! [lifecycle]
//! type = "queue"
//! appearance-mode = "during-close"
//! ```
//!
//! `appearanceMode` is accepted as an alias. Unknown keys are rejected.
//!
//! ```rust,ignore
//! let config = ModalConfig::from_toml_file("modal.toml")?;
//! let config = ModalConfig::from_json_str(r#"{"lifecycle":{"type":"multiple"}}"#)?;
//! ```
//!
//! Loaders are available with the `config` feature.

#[cfg(feature = "config")]
use std::path::Path;

use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// When the next queued instance appears relative to the closing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum AppearanceMode {
    /// Admit the next instance once the current one is fully closed.
    #[default]
    AfterClose,
    /// Admit the next instance as soon as the current one starts closing.
    DuringClose,
}

impl AppearanceMode {
    /// Kebab-case name, matching the config file format.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AfterClose => "after-close",
            Self::DuringClose => "during-close",
        }
    }
}

impl fmt::Display for AppearanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admission policy for a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "config",
    serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)
)]
pub enum LifecyclePolicy {
    /// Every instance opens immediately; instances stack.
    Multiple,
    /// At most one instance is admitted at a time; the rest wait in order.
    Queue {
        /// Trigger point for admitting the next instance.
        #[cfg_attr(
            feature = "config",
            serde(rename = "appearance-mode", alias = "appearanceMode", default)
        )]
        appearance: AppearanceMode,
    },
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self::queue(AppearanceMode::AfterClose)
    }
}

impl LifecyclePolicy {
    /// Queue policy with the given appearance mode.
    #[must_use]
    pub const fn queue(appearance: AppearanceMode) -> Self {
        Self::Queue { appearance }
    }

    /// Stacking policy.
    #[must_use]
    pub const fn multiple() -> Self {
        Self::Multiple
    }

    /// Whether this is a queue policy.
    #[inline]
    pub const fn is_queue(self) -> bool {
        matches!(self, Self::Queue { .. })
    }

    /// Appearance mode, if this is a queue policy.
    #[inline]
    pub const fn appearance(self) -> Option<AppearanceMode> {
        match self {
            Self::Queue { appearance } => Some(appearance),
            Self::Multiple => None,
        }
    }

    /// Whether the queue advances when an instance starts closing.
    #[inline]
    pub const fn advances_on_close_start(self) -> bool {
        matches!(
            self,
            Self::Queue {
                appearance: AppearanceMode::DuringClose
            }
        )
    }

    /// Whether the queue advances when an instance finishes closing.
    #[inline]
    pub const fn advances_on_closed(self) -> bool {
        matches!(
            self,
            Self::Queue {
                appearance: AppearanceMode::AfterClose
            }
        )
    }
}

impl fmt::Display for LifecyclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Multiple => f.write_str("multiple"),
            Self::Queue { appearance } => write!(f, "queue/{appearance}"),
        }
    }
}

/// Top-level configuration for a modal manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct ModalConfig {
    /// Admission policy.
    pub lifecycle: LifecyclePolicy,
}

impl ModalConfig {
    /// Config with the given policy.
    #[must_use]
    pub const fn new(lifecycle: LifecyclePolicy) -> Self {
        Self { lifecycle }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

/// Errors from loading a [`ModalConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
        }
    }
}
