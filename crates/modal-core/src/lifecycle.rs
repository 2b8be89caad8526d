#![forbid(unsafe_code)]

//! Lifecycle states of a modal instance.

use std::fmt;

/// Current phase of a modal instance.
///
/// State machine: Pending → Opened → Closing → Closed.
///
/// Transitions are strictly forward. The derived ordering follows the state
/// machine, so a state never compares lower than an earlier observation of
/// the same instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LifecycleState {
    /// Created and tracked, waiting for admission.
    #[default]
    Pending,
    /// Admitted and visible.
    Opened,
    /// Close requested; visible until every delay token is released.
    Closing,
    /// Finished. The instance is inert.
    Closed,
}

impl LifecycleState {
    /// Upper-case name, as shown to rendering layers.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Opened => "OPENED",
            Self::Closing => "CLOSING",
            Self::Closed => "CLOSED",
        }
    }

    /// Whether an instance in this state appears in the published list.
    #[inline]
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Opened | Self::Closing)
    }

    /// Whether no further transition is possible.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_state_machine() {
        assert!(LifecycleState::Pending < LifecycleState::Opened);
        assert!(LifecycleState::Opened < LifecycleState::Closing);
        assert!(LifecycleState::Closing < LifecycleState::Closed);
    }

    #[test]
    fn visibility() {
        assert!(!LifecycleState::Pending.is_visible());
        assert!(LifecycleState::Opened.is_visible());
        assert!(LifecycleState::Closing.is_visible());
        assert!(!LifecycleState::Closed.is_visible());
        assert!(LifecycleState::Closed.is_terminal());
    }

    #[test]
    fn display_names() {
        assert_eq!(LifecycleState::default().to_string(), "PENDING");
        assert_eq!(LifecycleState::Closing.to_string(), "CLOSING");
    }
}
