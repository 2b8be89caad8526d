#![forbid(unsafe_code)]

//! Process-wide identifiers for modal instances and close-delay tokens.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for unique modal IDs.
static MODAL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Global counter for close-delay tokens.
static DELAY_TOKEN_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for one modal instance.
///
/// IDs are never reused for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModalId(u64);

impl ModalId {
    /// Allocate a fresh ID.
    #[must_use]
    pub fn next() -> Self {
        Self(MODAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle for one outstanding reason to postpone a close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DelayToken(u64);

impl DelayToken {
    pub(crate) fn next() -> Self {
        Self(DELAY_TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modal_ids_increase() {
        let a = ModalId::next();
        let b = ModalId::next();
        assert!(b > a);
        assert_ne!(a.get(), b.get());
    }

    #[test]
    fn delay_tokens_unique() {
        let a = DelayToken::next();
        let b = DelayToken::next();
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_raw_value() {
        let id = ModalId::next();
        assert_eq!(id.to_string(), id.get().to_string());
    }
}
