use property_registry::RegistryError;
use session_client::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("SDK not initialized; call camprop_sdk::initialize() first")]
    NotInitialized,

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SdkError {
    /// True when the device simply does not have the property
    pub fn is_not_found(&self) -> bool {
        match self {
            SdkError::Registry(e) => e.is_not_found(),
            SdkError::Session(SessionError::PropertyNotFound(_)) => true,
            _ => false,
        }
    }

    /// True when a lifecycle transition did not finish in time
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            SdkError::Registry(RegistryError::Timeout { .. })
                | SdkError::Session(SessionError::Timeout { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
