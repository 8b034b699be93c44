//! Configuration types for the camprop SDK
//!
//! [`SdkConfig`] controls how long lifecycle transitions may take and where
//! device profiles are loaded from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use session_client::DeviceCatalog;

use crate::error::{Result, SdkError};

/// Environment variable overriding [`SdkConfig::state_timeout`], in milliseconds
pub const ENV_STATE_TIMEOUT_MS: &str = "CAMPROP_STATE_TIMEOUT_MS";

/// Environment variable overriding [`SdkConfig::profile_path`]
pub const ENV_PROFILE: &str = "CAMPROP_PROFILE";

const MAX_STATE_TIMEOUT: Duration = Duration::from_secs(600);

/// Configuration for opening and driving devices
#[derive(Debug, Clone, PartialEq)]
pub struct SdkConfig {
    /// Maximum wait for a lifecycle transition
    /// Default: 4 seconds
    pub state_timeout: Duration,

    /// Device profile file; `None` falls back to [`default_profile_path`]
    /// and then to the built-in catalog
    /// Default: None
    pub profile_path: Option<PathBuf>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            state_timeout: Duration::from_secs(4),
            profile_path: None,
        }
    }
}

impl SdkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Short timeouts for simulated devices and tests
    pub fn fast() -> Self {
        Self {
            state_timeout: Duration::from_millis(500),
            ..Default::default()
        }
    }

    /// Long timeouts for slow network cameras
    pub fn patient() -> Self {
        Self {
            state_timeout: Duration::from_secs(30),
            ..Default::default()
        }
    }

    pub fn with_state_timeout(mut self, timeout: Duration) -> Self {
        self.state_timeout = timeout;
        self
    }

    pub fn with_profile_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.profile_path = Some(path.into());
        self
    }

    /// Defaults with `CAMPROP_STATE_TIMEOUT_MS` and `CAMPROP_PROFILE` applied
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(ENV_STATE_TIMEOUT_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                SdkError::Config(format!(
                    "{} must be a number of milliseconds, got '{}'",
                    ENV_STATE_TIMEOUT_MS, raw
                ))
            })?;
            self.state_timeout = Duration::from_millis(millis);
        }

        if let Some(path) = lookup(ENV_PROFILE) {
            if !path.trim().is_empty() {
                self.profile_path = Some(PathBuf::from(path));
            }
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.state_timeout == Duration::ZERO {
            return Err(SdkError::Config(
                "State timeout must be greater than 0".to_string(),
            ));
        }

        if self.state_timeout > MAX_STATE_TIMEOUT {
            return Err(SdkError::Config(format!(
                "State timeout must not exceed {:?}",
                MAX_STATE_TIMEOUT
            )));
        }

        if let Some(path) = &self.profile_path {
            if path.as_os_str().is_empty() {
                return Err(SdkError::Config("Profile path must not be empty".to_string()));
            }
        }

        Ok(())
    }

    /// Load the device catalog this configuration points at
    ///
    /// An explicit `profile_path` must exist. Without one the per-user
    /// profile file is used when present, otherwise the built-in catalog.
    pub fn catalog(&self) -> Result<DeviceCatalog> {
        if let Some(path) = &self.profile_path {
            return load_catalog(path);
        }

        match default_profile_path() {
            Some(path) if path.is_file() => load_catalog(&path),
            _ => {
                tracing::debug!("Using built-in device catalog");
                Ok(DeviceCatalog::builtin())
            }
        }
    }
}

/// Per-user device profile file, `<config dir>/camprop/devices.json`
pub fn default_profile_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("camprop").join("devices.json"))
}

fn load_catalog(path: &Path) -> Result<DeviceCatalog> {
    tracing::debug!("Loading device profiles from {}", path.display());
    Ok(DeviceCatalog::from_path(path)?)
}
