#![forbid(unsafe_code)]

//! Errors returned by the modal manager and its handles.

use std::fmt;

use crate::id::ModalId;
use crate::windows::ModalKey;

/// Modal engine errors.
///
/// Unknown ids on close and unknown delay tokens are not errors; those calls
/// are silently ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalError {
    /// `open` was called with a key that has no registered element.
    UnknownKey(ModalKey),
    /// A handle was used after its manager was dropped.
    Detached {
        /// Instance the handle refers to.
        id: ModalId,
    },
}

impl fmt::Display for ModalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(key) => write!(f, "no modal registered under key '{key}'"),
            Self::Detached { id } => {
                write!(f, "modal {id} is detached: its manager no longer exists")
            }
        }
    }
}

impl std::error::Error for ModalError {}

/// Standard result type for modal operations.
pub type Result<T> = std::result::Result<T, ModalError>;
