//! The property registry client
//!
//! [`RegistryClient`] borrows a [`DeviceSession`] and turns its raw, untyped
//! records into typed descriptors and checked reads and writes. Nothing is
//! cached: every call asks the session again, so callers may re-enumerate
//! after a lifecycle transition and observe a different property set.

use session_client::{BooleanEncoding, DeviceSession, RawValue};

use crate::descriptor::{PropertyDescriptor, PropertyInfo};
use crate::error::{RegistryError, Result};
use crate::kind::PropertyKind;
use crate::value::{parse_boolean_token, FromPropertyValue, PropertyValue};

/// Typed property access over a borrowed device session
pub struct RegistryClient<'s, S: DeviceSession + ?Sized> {
    session: &'s S,
}

/// Create a registry client for `session`
pub fn open_registry<S: DeviceSession + ?Sized>(session: &S) -> RegistryClient<'_, S> {
    RegistryClient::new(session)
}

impl<'s, S: DeviceSession + ?Sized> RegistryClient<'s, S> {
    pub fn new(session: &'s S) -> Self {
        Self { session }
    }

    /// The session this client reads from
    pub fn session(&self) -> &'s S {
        self.session
    }

    /// Names visible in the session's current lifecycle state
    ///
    /// The order is the session's enumeration order and does not change
    /// while the state and property set stay the same.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let records = self.session.raw_enumerate()?;
        Ok(records.into_iter().map(|r| r.name).collect())
    }

    /// Whether `name` is currently visible
    ///
    /// Probing for an optional property is an ordinary query, not an error
    /// path.
    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.list_names()?.iter().any(|n| n == name))
    }

    /// Fetch a fully populated descriptor for `name`
    pub fn get_descriptor(&self, name: &str) -> Result<PropertyDescriptor> {
        if name.is_empty() {
            return Err(RegistryError::NotFound(String::new()));
        }

        let record = self
            .session
            .raw_enumerate()?
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        PropertyDescriptor::from_raw(record, |n| Ok(self.session.raw_menu_entries(n)?))
    }

    /// Read the current value of `name` as `T`
    ///
    /// ```rust,ignore
    /// let auto: bool = registry.get_value("Exposure Auto")?;
    /// let brightness: i64 = registry.get_value("Brightness")?;
    /// ```
    pub fn get_value<T: FromPropertyValue>(&self, name: &str) -> Result<T> {
        let descriptor = self.get_descriptor(name)?;
        let kind = descriptor.kind();
        let value = descriptor.value()?;

        T::from_property_value(value, kind)
            .ok_or_else(|| RegistryError::mismatch(name, T::EXPECTED, kind.as_str()))
    }

    /// Write a new value to `name`
    ///
    /// Checks run in a fixed order and stop at the first failure: the name
    /// must be visible, the property must not be a button, the value type
    /// must fit the kind, and the value must lie within the declared range
    /// or menu.
    pub fn set_value(&self, name: &str, value: impl Into<PropertyValue>) -> Result<()> {
        let value = value.into();
        let descriptor = self.get_descriptor(name)?;
        let wire = validate(&descriptor, value, self.session.boolean_encoding())?;

        tracing::debug!(
            "Setting '{}' on {} to {}",
            name,
            self.session.identifier(),
            wire
        );
        self.session.raw_set(name, wire)?;
        Ok(())
    }

    /// Fire a button property once
    pub fn trigger(&self, name: &str) -> Result<()> {
        let descriptor = self.get_descriptor(name)?;
        if descriptor.kind() != PropertyKind::Button {
            return Err(RegistryError::mismatch(
                name,
                PropertyKind::Button.as_str(),
                descriptor.kind().as_str(),
            ));
        }

        tracing::debug!("Triggering '{}' on {}", name, self.session.identifier());
        self.session.raw_trigger(name)?;
        Ok(())
    }
}

/// Check `value` against the descriptor and encode it for the wire
fn validate(
    descriptor: &PropertyDescriptor,
    value: PropertyValue,
    encoding: BooleanEncoding,
) -> Result<RawValue> {
    let name = descriptor.name();
    let mismatch = |expected: &str, value: &PropertyValue| {
        RegistryError::mismatch(name, expected, value.type_name())
    };
    let out_of_range = |value: &dyn std::fmt::Display, allowed: String| RegistryError::OutOfRange {
        name: name.to_string(),
        value: value.to_string(),
        allowed,
    };

    match descriptor.info() {
        PropertyInfo::Button => Err(RegistryError::ReadOnly(name.to_string())),

        PropertyInfo::Integer {
            minimum, maximum, ..
        } => {
            let v = match value {
                PropertyValue::Integer(i) => i,
                PropertyValue::Double(d) => {
                    if !(*minimum as f64..=*maximum as f64).contains(&d) {
                        return Err(out_of_range(&d, format!("[{}, {}]", minimum, maximum)));
                    }
                    if d.fract() != 0.0 {
                        return Err(out_of_range(
                            &d,
                            format!("whole numbers in [{}, {}]", minimum, maximum),
                        ));
                    }
                    d as i64
                }
                other => return Err(mismatch("integer", &other)),
            };
            if !(*minimum..=*maximum).contains(&v) {
                return Err(out_of_range(&v, format!("[{}, {}]", minimum, maximum)));
            }
            Ok(RawValue::Int(v))
        }

        PropertyInfo::Double {
            minimum, maximum, ..
        } => {
            let v = match value {
                PropertyValue::Double(d) => d,
                PropertyValue::Integer(i) => i as f64,
                other => return Err(mismatch("double", &other)),
            };
            if !(*minimum..=*maximum).contains(&v) {
                return Err(out_of_range(&v, format!("[{}, {}]", minimum, maximum)));
            }
            Ok(RawValue::Double(v))
        }

        PropertyInfo::Boolean { .. } => {
            let v = match &value {
                PropertyValue::Boolean(b) => *b,
                PropertyValue::String(s) => match parse_boolean_token(s) {
                    Some(b) => b,
                    None => return Err(mismatch("boolean or boolean token", &value)),
                },
                _ => return Err(mismatch("boolean", &value)),
            };
            Ok(encode_boolean(v, encoding))
        }

        PropertyInfo::String { .. } => match value {
            PropertyValue::String(s) => Ok(RawValue::Str(s)),
            other => Err(mismatch("string", &other)),
        },

        PropertyInfo::Enum { entries, .. } => match value {
            PropertyValue::String(s) if entries.contains(&s) => Ok(RawValue::Str(s)),
            PropertyValue::String(s) => Err(out_of_range(&s, entries.join(", "))),
            other => Err(mismatch("string", &other)),
        },
    }
}

fn encode_boolean(value: bool, encoding: BooleanEncoding) -> RawValue {
    match encoding {
        BooleanEncoding::Native => RawValue::Bool(value),
        BooleanEncoding::OnOff => RawValue::Str(if value { "On" } else { "Off" }.to_string()),
    }
}
