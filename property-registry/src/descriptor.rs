//! Property descriptors
//!
//! A [`PropertyDescriptor`] is a snapshot of one property's metadata and
//! value, parsed from the session's raw record. The kind-dependent payload is
//! held in [`PropertyInfo`], so a descriptor can never carry a range on a
//! boolean or a value on a button.

use serde::Serialize;
use session_client::{RawProperty, RawValue};

use crate::error::{RegistryError, Result};
use crate::kind::PropertyKind;
use crate::value::{parse_boolean_token, PropertyValue};

/// Kind-specific part of a descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PropertyInfo {
    Integer {
        value: i64,
        minimum: i64,
        maximum: i64,
        step: i64,
        default: i64,
    },
    Double {
        value: f64,
        minimum: f64,
        maximum: f64,
        step: f64,
        default: f64,
    },
    Boolean {
        value: bool,
        default: bool,
    },
    String {
        value: String,
        default: String,
    },
    Button,
    Enum {
        value: String,
        default: String,
        entries: Vec<String>,
    },
}

impl PropertyInfo {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyInfo::Integer { .. } => PropertyKind::Integer,
            PropertyInfo::Double { .. } => PropertyKind::Double,
            PropertyInfo::Boolean { .. } => PropertyKind::Boolean,
            PropertyInfo::String { .. } => PropertyKind::String,
            PropertyInfo::Button => PropertyKind::Button,
            PropertyInfo::Enum { .. } => PropertyKind::Enum,
        }
    }
}

/// Snapshot of one property
///
/// Only authoritative at the moment it was fetched; re-fetch to observe
/// later changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDescriptor {
    name: String,
    category: String,
    group: String,
    #[serde(flatten)]
    info: PropertyInfo,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, category: impl Into<String>, group: impl Into<String>, info: PropertyInfo) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            group: group.into(),
            info,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PropertyKind {
        self.info.kind()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn info(&self) -> &PropertyInfo {
        &self.info
    }

    fn not_applicable(&self, expected: &str) -> RegistryError {
        RegistryError::mismatch(&self.name, expected, self.kind().as_str())
    }

    /// Current value; fails for buttons
    pub fn value(&self) -> Result<PropertyValue> {
        match &self.info {
            PropertyInfo::Integer { value, .. } => Ok(PropertyValue::Integer(*value)),
            PropertyInfo::Double { value, .. } => Ok(PropertyValue::Double(*value)),
            PropertyInfo::Boolean { value, .. } => Ok(PropertyValue::Boolean(*value)),
            PropertyInfo::String { value, .. } | PropertyInfo::Enum { value, .. } => {
                Ok(PropertyValue::String(value.clone()))
            }
            PropertyInfo::Button => Err(self.not_applicable("a valued kind")),
        }
    }

    /// Default value; fails for buttons
    pub fn default_value(&self) -> Result<PropertyValue> {
        match &self.info {
            PropertyInfo::Integer { default, .. } => Ok(PropertyValue::Integer(*default)),
            PropertyInfo::Double { default, .. } => Ok(PropertyValue::Double(*default)),
            PropertyInfo::Boolean { default, .. } => Ok(PropertyValue::Boolean(*default)),
            PropertyInfo::String { default, .. } | PropertyInfo::Enum { default, .. } => {
                Ok(PropertyValue::String(default.clone()))
            }
            PropertyInfo::Button => Err(self.not_applicable("a valued kind")),
        }
    }

    /// Lower bound; only for numeric kinds
    pub fn minimum(&self) -> Result<PropertyValue> {
        match &self.info {
            PropertyInfo::Integer { minimum, .. } => Ok(PropertyValue::Integer(*minimum)),
            PropertyInfo::Double { minimum, .. } => Ok(PropertyValue::Double(*minimum)),
            _ => Err(self.not_applicable("integer or double")),
        }
    }

    /// Upper bound; only for numeric kinds
    pub fn maximum(&self) -> Result<PropertyValue> {
        match &self.info {
            PropertyInfo::Integer { maximum, .. } => Ok(PropertyValue::Integer(*maximum)),
            PropertyInfo::Double { maximum, .. } => Ok(PropertyValue::Double(*maximum)),
            _ => Err(self.not_applicable("integer or double")),
        }
    }

    /// Step size; only for numeric kinds
    pub fn step(&self) -> Result<PropertyValue> {
        match &self.info {
            PropertyInfo::Integer { step, .. } => Ok(PropertyValue::Integer(*step)),
            PropertyInfo::Double { step, .. } => Ok(PropertyValue::Double(*step)),
            _ => Err(self.not_applicable("integer or double")),
        }
    }

    /// Allowed entries; only for enums
    pub fn enum_entries(&self) -> Result<&[String]> {
        match &self.info {
            PropertyInfo::Enum { entries, .. } => Ok(entries),
            _ => Err(self.not_applicable("enum")),
        }
    }

    /// Build a descriptor from a raw record
    ///
    /// `menu_entries` is only consulted for enum records. Any missing or
    /// ill-typed field fails the whole parse.
    pub(crate) fn from_raw(
        raw: RawProperty,
        menu_entries: impl FnOnce(&str) -> Result<Vec<String>>,
    ) -> Result<Self> {
        let kind: PropertyKind = raw.kind.parse().map_err(|_| RegistryError::Unsupported {
            name: raw.name.clone(),
            kind: raw.kind.clone(),
        })?;

        let name = raw.name.as_str();
        let info = match kind {
            PropertyKind::Integer => {
                let minimum = to_i64(name, "minimum", raw.minimum.as_ref())?;
                let maximum = to_i64(name, "maximum", raw.maximum.as_ref())?;
                check_bounds(name, minimum as f64, maximum as f64)?;
                PropertyInfo::Integer {
                    value: to_i64(name, "value", raw.value.as_ref())?,
                    minimum,
                    maximum,
                    step: to_i64(name, "step", raw.step.as_ref())?,
                    default: to_i64(name, "default", raw.default_value.as_ref())?,
                }
            }
            PropertyKind::Double => {
                let minimum = to_f64(name, "minimum", raw.minimum.as_ref())?;
                let maximum = to_f64(name, "maximum", raw.maximum.as_ref())?;
                check_bounds(name, minimum, maximum)?;
                PropertyInfo::Double {
                    value: to_f64(name, "value", raw.value.as_ref())?,
                    minimum,
                    maximum,
                    step: to_f64(name, "step", raw.step.as_ref())?,
                    default: to_f64(name, "default", raw.default_value.as_ref())?,
                }
            }
            PropertyKind::Boolean => PropertyInfo::Boolean {
                value: to_bool(name, "value", raw.value.as_ref())?,
                default: to_bool(name, "default", raw.default_value.as_ref())?,
            },
            PropertyKind::String => PropertyInfo::String {
                value: to_string(name, "value", raw.value.as_ref())?,
                default: to_string(name, "default", raw.default_value.as_ref())?,
            },
            PropertyKind::Button => PropertyInfo::Button,
            PropertyKind::Enum => PropertyInfo::Enum {
                value: to_string(name, "value", raw.value.as_ref())?,
                default: to_string(name, "default", raw.default_value.as_ref())?,
                entries: menu_entries(name)?,
            },
        };

        Ok(Self {
            name: raw.name,
            category: raw.category,
            group: raw.group,
            info,
        })
    }
}

fn required<'a>(name: &str, field: &str, raw: Option<&'a RawValue>) -> Result<&'a RawValue> {
    raw.ok_or_else(|| RegistryError::invalid(name, format!("missing {}", field)))
}

fn to_i64(name: &str, field: &str, raw: Option<&RawValue>) -> Result<i64> {
    match required(name, field, raw)? {
        RawValue::Int(i) => Ok(*i),
        RawValue::Double(d) if d.fract() == 0.0 && d.abs() < i64::MAX as f64 => Ok(*d as i64),
        other => Err(RegistryError::invalid(
            name,
            format!("{} '{}' is not an integer", field, other),
        )),
    }
}

fn to_f64(name: &str, field: &str, raw: Option<&RawValue>) -> Result<f64> {
    match required(name, field, raw)? {
        RawValue::Int(i) => Ok(*i as f64),
        RawValue::Double(d) => Ok(*d),
        other => Err(RegistryError::invalid(
            name,
            format!("{} '{}' is not a number", field, other),
        )),
    }
}

/// Booleans arrive either natively or as a token such as `"On"`
fn to_bool(name: &str, field: &str, raw: Option<&RawValue>) -> Result<bool> {
    match required(name, field, raw)? {
        RawValue::Bool(b) => Ok(*b),
        RawValue::Str(s) => parse_boolean_token(s).ok_or_else(|| {
            RegistryError::invalid(name, format!("{} '{}' is not a boolean token", field, s))
        }),
        other => Err(RegistryError::invalid(
            name,
            format!("{} '{}' is not a boolean", field, other),
        )),
    }
}

fn to_string(name: &str, field: &str, raw: Option<&RawValue>) -> Result<String> {
    match required(name, field, raw)? {
        RawValue::Str(s) => Ok(s.clone()),
        other => Err(RegistryError::invalid(
            name,
            format!("{} '{}' is not a string", field, other),
        )),
    }
}

fn check_bounds(name: &str, minimum: f64, maximum: f64) -> Result<()> {
    if minimum > maximum {
        return Err(RegistryError::invalid(
            name,
            format!("minimum {} exceeds maximum {}", minimum, maximum),
        ));
    }
    Ok(())
}
