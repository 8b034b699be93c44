//! Property handles for typed access to well-known properties
//!
//! This module provides the `PropertyHandle<P>` generic type and the marker
//! types for the properties the SDK knows by name.

mod handles;
mod well_known;

pub use handles::{ButtonProperty, DeviceProperty, PropertyHandle, ValueProperty};

pub use well_known::{
    Brightness, BrightnessHandle, ExposureAuto, ExposureAutoHandle, ExposureTime,
    ExposureTimeHandle, Gain, GainAuto, GainAutoHandle, GainHandle, SoftwareTrigger,
    SoftwareTriggerHandle,
};
