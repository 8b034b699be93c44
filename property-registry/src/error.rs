use std::time::Duration;

use session_client::{LifecycleState, SessionError};
use thiserror::Error;

/// Errors returned by the property registry
///
/// Every failure is surfaced to the caller as-is; the registry never retries
/// or substitutes a default value.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The name is not visible in the session's current state
    #[error("Property not found: {0}")]
    NotFound(String),

    /// The requested or supplied type does not fit the property's kind
    #[error("Type mismatch on '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// The value lies outside the declared range or menu
    #[error("Value {value} out of range for '{name}': allowed {allowed}")]
    OutOfRange {
        name: String,
        value: String,
        allowed: String,
    },

    /// Value writes on a button; use `trigger` instead
    #[error("Property '{0}' is read-only")]
    ReadOnly(String),

    /// A lifecycle transition did not finish in time
    #[error("Timed out after {waited:?} waiting for state {target}")]
    Timeout {
        target: LifecycleState,
        waited: Duration,
    },

    /// The session reported a kind outside the closed kind set
    #[error("Unsupported kind '{kind}' for property '{name}'")]
    Unsupported { name: String, kind: String },

    /// The session reported a record whose fields do not fit its kind
    #[error("Invalid descriptor for '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    /// Any other failure of the underlying session
    #[error("Session error: {0}")]
    Session(SessionError),
}

impl RegistryError {
    pub(crate) fn mismatch(name: &str, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            name: name.to_string(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the ordinary "this device does not have it" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound(_))
    }
}

impl From<SessionError> for RegistryError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::PropertyNotFound(name) => RegistryError::NotFound(name),
            SessionError::Timeout { target, waited } => RegistryError::Timeout { target, waited },
            other => RegistryError::Session(other),
        }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_conversion() {
        let err: RegistryError = SessionError::PropertyNotFound("Gain Auto".to_string()).into();
        assert!(matches!(err, RegistryError::NotFound(ref n) if n == "Gain Auto"));
        assert!(err.is_not_found());

        let err: RegistryError = SessionError::Timeout {
            target: LifecycleState::Active,
            waited: Duration::from_secs(4),
        }
        .into();
        assert!(matches!(err, RegistryError::Timeout { .. }));

        let err: RegistryError = SessionError::Closed.into();
        assert!(matches!(err, RegistryError::Session(SessionError::Closed)));
    }

    #[test]
    fn test_error_display() {
        let err = RegistryError::ReadOnly("Software Trigger".to_string());
        assert_eq!(err.to_string(), "Property 'Software Trigger' is read-only");

        let err = RegistryError::mismatch("Exposure Auto", "boolean", "string");
        assert_eq!(
            err.to_string(),
            "Type mismatch on 'Exposure Auto': expected boolean, found string"
        );
    }
}
