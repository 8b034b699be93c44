//! Declarative device profiles for the simulated backend
//!
//! A profile lists the properties a device exposes, their initial values and
//! ranges, and which of them are software-emulated (visible only while the
//! session is active). Profiles are plain JSON:
//!
//! ```json
//! {
//!   "serial": "27710767",
//!   "model": "DFK 72BUC02",
//!   "boolean_encoding": "native",
//!   "properties": [
//!     { "name": "Brightness", "kind": "integer", "value": 0,
//!       "minimum": 0, "maximum": 255, "default": 0, "step": 1,
//!       "category": "Image", "group": "Brightness" },
//!     { "name": "Exposure Auto", "kind": "boolean", "value": true,
//!       "default": true, "software_emulated": true }
//!   ]
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};
use crate::{BooleanEncoding, RawProperty, RawValue};

/// Description of one simulated device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub serial: String,
    pub model: String,
    #[serde(default)]
    pub boolean_encoding: BooleanEncoding,
    /// Time a lifecycle transition takes to complete
    #[serde(default)]
    pub transition_latency_ms: u64,
    pub properties: Vec<PropertySpec>,
}

/// Description of one simulated property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    pub name: String,
    /// Wire kind string; not checked here so unsupported kinds can be modelled
    pub kind: String,
    #[serde(default)]
    pub value: Option<RawValue>,
    #[serde(default)]
    pub minimum: Option<RawValue>,
    #[serde(default)]
    pub maximum: Option<RawValue>,
    #[serde(default, rename = "default")]
    pub default_value: Option<RawValue>,
    #[serde(default)]
    pub step: Option<RawValue>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub entries: Vec<String>,
    #[serde(default)]
    pub software_emulated: bool,
}

impl PropertySpec {
    fn bare(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            value: None,
            minimum: None,
            maximum: None,
            default_value: None,
            step: None,
            category: String::new(),
            group: String::new(),
            entries: Vec::new(),
            software_emulated: false,
        }
    }

    pub fn integer(name: &str, value: i64, minimum: i64, maximum: i64, step: i64) -> Self {
        Self {
            value: Some(RawValue::Int(value)),
            minimum: Some(RawValue::Int(minimum)),
            maximum: Some(RawValue::Int(maximum)),
            default_value: Some(RawValue::Int(value)),
            step: Some(RawValue::Int(step)),
            ..Self::bare(name, "integer")
        }
    }

    pub fn double(name: &str, value: f64, minimum: f64, maximum: f64, step: f64) -> Self {
        Self {
            value: Some(RawValue::Double(value)),
            minimum: Some(RawValue::Double(minimum)),
            maximum: Some(RawValue::Double(maximum)),
            default_value: Some(RawValue::Double(value)),
            step: Some(RawValue::Double(step)),
            ..Self::bare(name, "double")
        }
    }

    /// Boolean property stored in the given wire encoding
    pub fn boolean(name: &str, value: bool, encoding: BooleanEncoding) -> Self {
        let raw = match encoding {
            BooleanEncoding::Native => RawValue::Bool(value),
            BooleanEncoding::OnOff => RawValue::Str(if value { "On" } else { "Off" }.to_string()),
        };
        Self {
            value: Some(raw.clone()),
            default_value: Some(raw),
            ..Self::bare(name, "boolean")
        }
    }

    pub fn string(name: &str, value: &str) -> Self {
        Self {
            value: Some(RawValue::Str(value.to_string())),
            default_value: Some(RawValue::Str(value.to_string())),
            ..Self::bare(name, "string")
        }
    }

    pub fn button(name: &str) -> Self {
        Self::bare(name, "button")
    }

    pub fn menu(name: &str, value: &str, entries: &[&str]) -> Self {
        Self {
            value: Some(RawValue::Str(value.to_string())),
            default_value: Some(RawValue::Str(value.to_string())),
            entries: entries.iter().map(|e| e.to_string()).collect(),
            ..Self::bare(name, "enum")
        }
    }

    pub fn grouped(mut self, category: &str, group: &str) -> Self {
        self.category = category.to_string();
        self.group = group.to_string();
        self
    }

    /// Mark the property as only materialized while the session is active
    pub fn software_emulated(mut self) -> Self {
        self.software_emulated = true;
        self
    }

    pub(crate) fn is_kind(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }

    pub(crate) fn to_raw(&self) -> RawProperty {
        RawProperty {
            name: self.name.clone(),
            kind: self.kind.clone(),
            value: self.value.clone(),
            minimum: self.minimum.clone(),
            maximum: self.maximum.clone(),
            default_value: self.default_value.clone(),
            step: self.step.clone(),
            category: self.category.clone(),
            group: self.group.clone(),
        }
    }
}

impl DeviceProfile {
    /// Parse a single profile from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: DeviceProfile = serde_json::from_str(json)
            .map_err(|e| SessionError::Profile(format!("Invalid profile JSON: {}", e)))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check that the profile can back a session
    pub fn validate(&self) -> Result<()> {
        if self.serial.is_empty() {
            return Err(SessionError::Profile("Serial must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for property in &self.properties {
            if property.name.is_empty() {
                return Err(SessionError::Profile(format!(
                    "Device {} has a property without a name",
                    self.serial
                )));
            }
            if !seen.insert(property.name.as_str()) {
                return Err(SessionError::Profile(format!(
                    "Device {} declares '{}' more than once",
                    self.serial, property.name
                )));
            }
        }

        Ok(())
    }

    /// USB camera whose auto functions run in software (DFK 72 family)
    pub fn usb_camera() -> Self {
        let enc = BooleanEncoding::Native;
        Self {
            serial: "27710767".to_string(),
            model: "DFK 72BUC02".to_string(),
            boolean_encoding: enc,
            transition_latency_ms: 0,
            properties: vec![
                PropertySpec::integer("Brightness", 0, 0, 255, 1).grouped("Image", "Brightness"),
                PropertySpec::integer("Exposure", 33333, 100, 30_000_000, 1)
                    .grouped("Exposure", "Exposure"),
                PropertySpec::double("Gain", 0.0, 0.0, 48.0, 0.1).grouped("Exposure", "Gain"),
                PropertySpec::boolean("Trigger Mode", false, enc).grouped("Special", "Trigger"),
                PropertySpec::button("Software Trigger").grouped("Special", "Trigger"),
                PropertySpec::string("Device User ID", "").grouped("Device", "Device"),
                PropertySpec::boolean("Exposure Auto", true, enc)
                    .grouped("Exposure", "Exposure")
                    .software_emulated(),
                PropertySpec::integer("Exposure Auto Reference", 128, 0, 255, 1)
                    .grouped("Exposure", "Exposure")
                    .software_emulated(),
                PropertySpec::boolean("Gain Auto", true, enc)
                    .grouped("Exposure", "Gain")
                    .software_emulated(),
                PropertySpec::menu(
                    "Auto Functions ROI Preset",
                    "Full Sensor",
                    &[
                        "Full Sensor",
                        "Custom Rectangle",
                        "Center 50%",
                        "Center 25%",
                        "Bottom Half",
                        "Top Half",
                    ],
                )
                .grouped("Special", "Auto Functions ROI")
                .software_emulated(),
            ],
        }
    }

    /// GigE camera that encodes booleans as `"On"` / `"Off"` and has no
    /// Brightness control
    pub fn gige_camera() -> Self {
        let enc = BooleanEncoding::OnOff;
        Self {
            serial: "46810320".to_string(),
            model: "DFK 33GP1300".to_string(),
            boolean_encoding: enc,
            transition_latency_ms: 0,
            properties: vec![
                PropertySpec::integer("Exposure", 10000, 20, 4_000_000, 1)
                    .grouped("Exposure", "Exposure"),
                PropertySpec::boolean("Exposure Auto", true, enc).grouped("Exposure", "Exposure"),
                PropertySpec::double("Gain", 0.0, 0.0, 36.0, 0.1).grouped("Exposure", "Gain"),
                PropertySpec::boolean("Gain Auto", true, enc).grouped("Exposure", "Gain"),
                PropertySpec::menu("Trigger Activation", "Rising Edge", &["Rising Edge", "Falling Edge"])
                    .grouped("Special", "Trigger"),
                PropertySpec::button("Trigger Software").grouped("Special", "Trigger"),
            ],
        }
    }
}
