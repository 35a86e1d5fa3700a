//! Component-level error types.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use thiserror::Error;

// Layer 3: Internal
use crate::util::ProcessId;

/// Errors produced while configuring or driving a [`super::Component`].
///
/// Follows the same structured-enum-plus-helper-methods pattern as the
/// teacher crate's `SystemError`.
#[derive(Error, Debug)]
pub enum ComponentError {
    /// Configuration failed validation.
    #[error("invalid component configuration: {0}")]
    InvalidConfig(String),

    /// A subscribed process could not be reached (its mailbox is gone).
    #[error("process not reachable: {0}")]
    ProcessUnreachable(ProcessId),

    /// The Coordinator task has stopped running.
    #[error("coordinator task is no longer running")]
    CoordinatorStopped,

    /// The transport reported a failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ComponentError {
    /// Construct an [`ComponentError::InvalidConfig`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Construct a [`ComponentError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Whether the condition may clear on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ProcessUnreachable(_) | Self::Transport(_))
    }

    /// Whether the component must be torn down.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CoordinatorStopped)
    }

    /// Whether the caller can keep using the component after this error.
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_display() {
        let err = ComponentError::invalid_config("offer_buffer must be at least 1");
        assert!(err.to_string().contains("offer_buffer"));
    }

    #[test]
    fn coordinator_stopped_is_fatal_and_unrecoverable() {
        let err = ComponentError::CoordinatorStopped;
        assert!(err.is_fatal());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn transport_error_is_transient_and_recoverable() {
        let err = ComponentError::transport("write failed");
        assert!(err.is_transient());
        assert!(err.is_recoverable());
    }

    #[test]
    fn process_unreachable_carries_id() {
        let err = ComponentError::ProcessUnreachable(ProcessId::new(3));
        assert!(err.to_string().contains("process-3"));
    }
}
