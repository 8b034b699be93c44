//! Device - Main entry point for the SDK
//!
//! Wraps one open device session with lifecycle control, typed property
//! handles and raw registry access.

use std::sync::Arc;

use property_registry::{open_registry, PropertyDescriptor, RegistryClient, RegistryError};
use session_client::{DeviceSession, LifecycleState, SessionProvider};

use crate::config::SdkConfig;
use crate::error::Result;
use crate::property::{DeviceProperty, PropertyHandle};
use crate::runtime::ensure_initialized;
use crate::survey::Survey;

/// An open capture device
///
/// Device is fully synchronous: lifecycle transitions block until reached or
/// until `state_timeout` elapses.
///
/// # Example
///
/// ```rust,ignore
/// use camprop_sdk::{Device, ExposureAuto, Brightness, SdkConfig};
///
/// fn main() -> Result<(), camprop_sdk::SdkError> {
///     camprop_sdk::initialize()?;
///     let device = Device::open_default(None, SdkConfig::default())?;
///
///     // Software-emulated auto functions need a running pipeline
///     device.start()?;
///
///     device.property::<ExposureAuto>().set(false)?;
///     if device.property::<Brightness>().is_available()? {
///         device.property::<Brightness>().set(200)?;
///     }
///
///     device.close()?;
///     Ok(())
/// }
/// ```
pub struct Device {
    session: Arc<dyn DeviceSession>,
    config: SdkConfig,
}

impl Device {
    /// Open a device through `provider`
    ///
    /// `identifier` selects a device by serial; `None` takes the first one.
    /// The device is left in the configured state.
    pub fn open<P: SessionProvider + ?Sized>(
        identifier: Option<&str>,
        provider: &P,
        config: SdkConfig,
    ) -> Result<Self> {
        ensure_initialized()?;
        config.validate()?;

        let session: Arc<dyn DeviceSession> = Arc::from(provider.open(identifier)?);
        tracing::info!(
            "Opened device {} ({})",
            session.identifier(),
            session.state()
        );

        Ok(Self { session, config })
    }

    /// Open a device from the catalog `config` points at
    pub fn open_default(identifier: Option<&str>, config: SdkConfig) -> Result<Self> {
        ensure_initialized()?;
        let catalog = config.catalog()?;
        Self::open(identifier, &catalog, config)
    }

    /// Serial of the underlying device
    pub fn identifier(&self) -> &str {
        self.session.identifier()
    }

    pub fn state(&self) -> LifecycleState {
        self.session.state()
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// The shared session, for advanced usage
    pub fn session(&self) -> &Arc<dyn DeviceSession> {
        &self.session
    }

    /// Start the pipeline and wait until the device is active
    pub fn start(&self) -> Result<()> {
        self.transition(LifecycleState::Active)
    }

    /// Stop the pipeline, returning to the configured state
    pub fn stop(&self) -> Result<()> {
        self.transition(LifecycleState::Configured)
    }

    /// Tear the session down; later calls on it fail
    pub fn close(&self) -> Result<()> {
        self.transition(LifecycleState::Closed)
    }

    fn transition(&self, target: LifecycleState) -> Result<()> {
        let from = self.session.state();
        self.session
            .request_state(target)
            .map_err(RegistryError::from)?;
        let reached = self
            .session
            .wait_state_reached(self.config.state_timeout)
            .map_err(RegistryError::from)?;

        tracing::info!(
            "Device {} {} -> {}",
            self.session.identifier(),
            from,
            reached
        );
        Ok(())
    }

    /// Untyped registry over this device
    pub fn registry(&self) -> RegistryClient<'_, dyn DeviceSession> {
        open_registry(self.session.as_ref())
    }

    /// Typed handle to a well-known property
    pub fn property<P: DeviceProperty>(&self) -> PropertyHandle<P> {
        PropertyHandle::new(Arc::clone(&self.session))
    }

    /// Enumerate in both lifecycle states and report the union
    ///
    /// Moves the device to configured, then to active, and finally back to
    /// the state it was in. Properties of unsupported kinds are skipped.
    ///
    /// When a step fails the original state is restored on a best-effort
    /// basis before the error is returned.
    pub fn survey(&self) -> Result<Survey> {
        let original = self.state();

        let (configured, active) = match self.survey_both_states(original) {
            Ok(found) => found,
            Err(e) => {
                self.restore(original);
                return Err(e);
            }
        };

        if original == LifecycleState::Configured {
            self.stop()?;
        }

        let survey = Survey::merge(configured, active);
        tracing::debug!(
            "Surveyed {} properties on {}",
            survey.len(),
            self.identifier()
        );
        Ok(survey)
    }

    fn survey_both_states(
        &self,
        original: LifecycleState,
    ) -> Result<(Vec<PropertyDescriptor>, Vec<PropertyDescriptor>)> {
        if original != LifecycleState::Configured {
            self.stop()?;
        }
        let configured = self.describe_all()?;

        self.start()?;
        let active = self.describe_all()?;
        Ok((configured, active))
    }

    fn restore(&self, original: LifecycleState) {
        if original == LifecycleState::Closed || self.state() == original {
            return;
        }
        if let Err(e) = self.transition(original) {
            tracing::warn!(
                "Could not return {} to {} after failed survey: {}",
                self.identifier(),
                original,
                e
            );
        }
    }

    fn describe_all(&self) -> Result<Vec<PropertyDescriptor>> {
        let registry = self.registry();
        let mut descriptors = Vec::new();

        for name in registry.list_names()? {
            match registry.get_descriptor(&name) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(e @ RegistryError::Unsupported { .. }) => {
                    tracing::warn!("Skipping {}: {}", name, e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(descriptors)
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("identifier", &self.session.identifier())
            .field("state", &self.session.state())
            .field("config", &self.config)
            .finish()
    }
}
