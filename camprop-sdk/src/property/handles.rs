//! Generic PropertyHandle for typed access to well-known properties
//!
//! Provides a consistent pattern for accessing a named property on a device:
//! - `get()` - Read the current value from the device
//! - `set()` - Validate and write a new value
//! - `trigger()` - Fire a button property
//! - `is_available()` - Probe whether the device currently exposes it

use std::marker::PhantomData;
use std::sync::Arc;

use property_registry::{
    open_registry, FromPropertyValue, PropertyDescriptor, PropertyKind, PropertyValue,
    RegistryClient, RegistryError,
};
use session_client::DeviceSession;

use crate::error::Result;

/// A property the SDK knows by name
///
/// Different device families name the same control differently; the handle
/// resolves to the first of `NAME` and `ALIASES` the device currently lists.
///
/// # Example
///
/// ```rust,ignore
/// pub struct Brightness;
///
/// impl DeviceProperty for Brightness {
///     const KEY: &'static str = "brightness";
///     const NAME: &'static str = "Brightness";
///     const KIND: PropertyKind = PropertyKind::Integer;
/// }
/// ```
pub trait DeviceProperty {
    /// Stable identifier, independent of device naming
    const KEY: &'static str;

    /// Property name as the device reports it
    const NAME: &'static str;

    /// Alternative names used by other device families
    const ALIASES: &'static [&'static str] = &[];

    /// Expected kind
    const KIND: PropertyKind;
}

/// A well-known property carrying a value
pub trait ValueProperty: DeviceProperty {
    type Value: FromPropertyValue + Into<PropertyValue>;
}

/// A well-known button property
pub trait ButtonProperty: DeviceProperty {}

/// Typed handle to one well-known property of an open device
///
/// Handles hold no value themselves: every call goes to the device, so a
/// handle created before `start()` sees software-emulated properties once the
/// device is active.
///
/// # Example
///
/// ```rust,ignore
/// let auto = device.property::<ExposureAuto>();
/// if auto.is_available()? {
///     auto.set(false)?;
///     assert!(!auto.get()?);
/// }
/// ```
pub struct PropertyHandle<P: DeviceProperty> {
    session: Arc<dyn DeviceSession>,
    _phantom: PhantomData<P>,
}

impl<P: DeviceProperty> Clone for PropertyHandle<P> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.session))
    }
}

impl<P: DeviceProperty> PropertyHandle<P> {
    pub fn new(session: Arc<dyn DeviceSession>) -> Self {
        Self {
            session,
            _phantom: PhantomData,
        }
    }

    fn registry(&self) -> RegistryClient<'_, dyn DeviceSession> {
        open_registry(self.session.as_ref())
    }

    /// Device name this handle resolves to right now, if any
    pub fn resolve(&self) -> Result<Option<&'static str>> {
        let names = self.registry().list_names()?;
        Ok(std::iter::once(P::NAME)
            .chain(P::ALIASES.iter().copied())
            .find(|candidate| names.iter().any(|n| n == candidate)))
    }

    fn resolved_name(&self) -> Result<&'static str> {
        Ok(self
            .resolve()?
            .ok_or_else(|| RegistryError::NotFound(P::NAME.to_string()))?)
    }

    /// Whether the device exposes this property in its current state
    ///
    /// Absence is an ordinary `false`, not an error.
    pub fn is_available(&self) -> Result<bool> {
        Ok(self.resolve()?.is_some())
    }

    /// Full descriptor of the resolved property
    ///
    /// Fails with `TypeMismatch` when the device reports a different kind
    /// than the SDK expects for this property.
    pub fn descriptor(&self) -> Result<PropertyDescriptor> {
        let name = self.resolved_name()?;
        let descriptor = self.registry().get_descriptor(name)?;
        if descriptor.kind() != P::KIND {
            return Err(RegistryError::TypeMismatch {
                name: name.to_string(),
                expected: P::KIND.to_string(),
                found: descriptor.kind().to_string(),
            }
            .into());
        }
        Ok(descriptor)
    }

    /// Identifier of the device this handle is bound to
    pub fn device_id(&self) -> &str {
        self.session.identifier()
    }

    pub fn key(&self) -> &'static str {
        P::KEY
    }
}

impl<P: ValueProperty> PropertyHandle<P> {
    /// Read the current value from the device
    pub fn get(&self) -> Result<P::Value> {
        let name = self.resolved_name()?;
        Ok(self.registry().get_value::<P::Value>(name)?)
    }

    /// Validate and write a new value
    pub fn set(&self, value: P::Value) -> Result<()> {
        let name = self.resolved_name()?;
        tracing::debug!("Setting {} via '{}' on {}", P::KEY, name, self.device_id());
        Ok(self.registry().set_value(name, value)?)
    }
}

impl<P: ButtonProperty> PropertyHandle<P> {
    /// Fire the button once
    pub fn trigger(&self) -> Result<()> {
        let name = self.resolved_name()?;
        Ok(self.registry().trigger(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{Brightness, ExposureAuto, Gain, SoftwareTrigger};
    use crate::SdkError;
    use session_client::{DeviceProfile, LifecycleState, SimulatedSession};
    use std::time::Duration;

    fn session(profile: DeviceProfile) -> Arc<SimulatedSession> {
        Arc::new(SimulatedSession::new(profile).unwrap())
    }

    fn handle<P: DeviceProperty>(session: &Arc<SimulatedSession>) -> PropertyHandle<P> {
        let session: Arc<dyn DeviceSession> = session.clone();
        PropertyHandle::new(session)
    }

    fn activate(session: &SimulatedSession) {
        session.request_state(LifecycleState::Active).unwrap();
        session.wait_state_reached(Duration::from_secs(1)).unwrap();
    }

    #[test]
    fn test_get_and_set_brightness() {
        let session = session(DeviceProfile::usb_camera());
        let brightness = handle::<Brightness>(&session);

        assert_eq!(brightness.get().unwrap(), 0);
        brightness.set(200).unwrap();
        assert_eq!(brightness.get().unwrap(), 200);
        assert_eq!(brightness.device_id(), "27710767");
        assert_eq!(brightness.key(), "brightness");
    }

    #[test]
    fn test_emulated_property_appears_after_activation() {
        let session = session(DeviceProfile::usb_camera());
        let auto = handle::<ExposureAuto>(&session);

        assert!(!auto.is_available().unwrap());
        assert!(auto.get().unwrap_err().is_not_found());

        activate(&session);
        assert!(auto.is_available().unwrap());
        auto.set(false).unwrap();
        assert!(!auto.get().unwrap());
    }

    #[test]
    fn test_missing_property_is_not_found() {
        let session = session(DeviceProfile::gige_camera());
        let brightness = handle::<Brightness>(&session);

        assert!(!brightness.is_available().unwrap());
        match brightness.set(200) {
            Err(SdkError::Registry(RegistryError::NotFound(name))) => {
                assert_eq!(name, "Brightness")
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_resolves_on_other_family() {
        let session = session(DeviceProfile::gige_camera());
        let trigger = handle::<SoftwareTrigger>(&session);

        assert_eq!(trigger.resolve().unwrap(), Some("Trigger Software"));
        trigger.trigger().unwrap();
        assert_eq!(session.trigger_count("Trigger Software"), 1);
    }

    #[test]
    fn test_out_of_range_set_is_rejected() {
        let session = session(DeviceProfile::gige_camera());
        let gain = handle::<Gain>(&session);

        assert!(matches!(
            gain.set(99.0),
            Err(SdkError::Registry(RegistryError::OutOfRange { .. }))
        ));
        assert_eq!(gain.get().unwrap(), 0.0);
    }

    #[test]
    fn test_handle_clone_shares_session() {
        let session = session(DeviceProfile::usb_camera());
        let brightness = handle::<Brightness>(&session);
        let cloned = brightness.clone();

        brightness.set(17).unwrap();
        assert_eq!(cloned.get().unwrap(), 17);
        assert_eq!(cloned.descriptor().unwrap().kind(), PropertyKind::Integer);
    }
}
