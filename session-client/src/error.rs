//! Error types for device sessions

use std::time::Duration;

use thiserror::Error;

use crate::LifecycleState;

/// Errors reported by a device session
#[derive(Debug, Error)]
pub enum SessionError {
    /// The named property is not visible in the session's current state
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// No device matches the requested identifier
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// A lifecycle transition did not complete within the allotted time
    #[error("Timed out after {waited:?} waiting for state {target}")]
    Timeout {
        target: LifecycleState,
        waited: Duration,
    },

    /// The session has been closed and accepts no further calls
    #[error("Session is closed")]
    Closed,

    /// The device refused a raw read, write or trigger
    #[error("Device rejected operation on '{name}': {reason}")]
    Rejected { name: String, reason: String },

    /// A transition was requested while another one is still pending
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },

    /// A device profile could not be loaded or is inconsistent
    #[error("Profile error: {0}")]
    Profile(String),
}

impl SessionError {
    pub(crate) fn rejected(name: &str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
