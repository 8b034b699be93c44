//! Properties the SDK knows by name
//!
//! Names follow the capture library's standard property naming. Auto
//! functions on some USB families are software-emulated and only appear once
//! the device is started.

use property_registry::PropertyKind;

use super::handles::{ButtonProperty, DeviceProperty, PropertyHandle, ValueProperty};

macro_rules! value_property {
    ($(#[$meta:meta])* $ty:ident, $key:literal, $name:literal, [$($alias:literal),*], $kind:ident, $value:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $ty;

        impl DeviceProperty for $ty {
            const KEY: &'static str = $key;
            const NAME: &'static str = $name;
            const ALIASES: &'static [&'static str] = &[$($alias),*];
            const KIND: PropertyKind = PropertyKind::$kind;
        }

        impl ValueProperty for $ty {
            type Value = $value;
        }
    };
}

value_property!(
    /// Automatic exposure control
    ExposureAuto, "exposure_auto", "Exposure Auto", [], Boolean, bool
);
value_property!(
    /// Automatic gain control
    GainAuto, "gain_auto", "Gain Auto", [], Boolean, bool
);
value_property!(
    /// Image brightness; absent on most GigE families
    Brightness, "brightness", "Brightness", [], Integer, i64
);
value_property!(
    /// Exposure time in microseconds
    ExposureTime, "exposure_time", "Exposure", ["Exposure Time", "ExposureTime"], Integer, i64
);
value_property!(
    /// Analog gain in dB
    Gain, "gain", "Gain", [], Double, f64
);

/// Fires one frame while trigger mode is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftwareTrigger;

impl DeviceProperty for SoftwareTrigger {
    const KEY: &'static str = "software_trigger";
    const NAME: &'static str = "Software Trigger";
    const ALIASES: &'static [&'static str] = &["Trigger Software", "TriggerSoftware"];
    const KIND: PropertyKind = PropertyKind::Button;
}

impl ButtonProperty for SoftwareTrigger {}

pub type ExposureAutoHandle = PropertyHandle<ExposureAuto>;

pub type GainAutoHandle = PropertyHandle<GainAuto>;

pub type BrightnessHandle = PropertyHandle<Brightness>;

pub type ExposureTimeHandle = PropertyHandle<ExposureTime>;

pub type GainHandle = PropertyHandle<Gain>;

pub type SoftwareTriggerHandle = PropertyHandle<SoftwareTrigger>;
