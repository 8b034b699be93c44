//! Typed property values and the typed read protocol

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::PropertyKind;

/// A typed property value
///
/// Enum properties carry their current entry as [`PropertyValue::String`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
}

impl PropertyValue {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Double(_) => "double",
            PropertyValue::String(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Double(d) => Some(*d),
            PropertyValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Boolean(v) => write!(f, "{}", v),
            PropertyValue::Integer(v) => write!(f, "{}", v),
            PropertyValue::Double(v) => write!(f, "{}", v),
            PropertyValue::String(v) => f.write_str(v),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Integer(value.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Double(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

/// Parse a boolean token
///
/// Accepted tokens, case-insensitive and trimmed: `On`/`Off`,
/// `true`/`false`, `1`/`0`.
pub fn parse_boolean_token(token: &str) -> Option<bool> {
    let token = token.trim();
    const TRUE: [&str; 3] = ["on", "true", "1"];
    const FALSE: [&str; 3] = ["off", "false", "0"];

    if TRUE.iter().any(|t| t.eq_ignore_ascii_case(token)) {
        Some(true)
    } else if FALSE.iter().any(|t| t.eq_ignore_ascii_case(token)) {
        Some(false)
    } else {
        None
    }
}

/// Types that can be read out of a property value
///
/// The conversion sees both the value and the property's kind so that, for
/// example, a `String` read accepts Enum properties while a `bool` read on
/// an Enum property fails.
pub trait FromPropertyValue: Sized {
    /// Name of the expected type, for error messages
    const EXPECTED: &'static str;

    fn from_property_value(value: PropertyValue, kind: PropertyKind) -> Option<Self>;
}

impl FromPropertyValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_property_value(value: PropertyValue, kind: PropertyKind) -> Option<Self> {
        match (kind, value) {
            (PropertyKind::Boolean, PropertyValue::Boolean(b)) => Some(b),
            _ => None,
        }
    }
}

impl FromPropertyValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_property_value(value: PropertyValue, kind: PropertyKind) -> Option<Self> {
        match (kind, value) {
            (PropertyKind::Integer, PropertyValue::Integer(i)) => Some(i),
            _ => None,
        }
    }
}

impl FromPropertyValue for i32 {
    const EXPECTED: &'static str = "integer";

    fn from_property_value(value: PropertyValue, kind: PropertyKind) -> Option<Self> {
        i64::from_property_value(value, kind).and_then(|i| i32::try_from(i).ok())
    }
}

impl FromPropertyValue for f64 {
    const EXPECTED: &'static str = "double";

    fn from_property_value(value: PropertyValue, kind: PropertyKind) -> Option<Self> {
        if !kind.is_numeric() {
            return None;
        }
        value.as_f64()
    }
}

impl FromPropertyValue for String {
    const EXPECTED: &'static str = "string";

    fn from_property_value(value: PropertyValue, kind: PropertyKind) -> Option<Self> {
        match (kind, value) {
            (PropertyKind::String | PropertyKind::Enum, PropertyValue::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl FromPropertyValue for PropertyValue {
    const EXPECTED: &'static str = "any value";

    fn from_property_value(value: PropertyValue, _kind: PropertyKind) -> Option<Self> {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_tokens() {
        assert_eq!(parse_boolean_token("On"), Some(true));
        assert_eq!(parse_boolean_token("off"), Some(false));
        assert_eq!(parse_boolean_token(" TRUE "), Some(true));
        assert_eq!(parse_boolean_token("0"), Some(false));
        assert_eq!(parse_boolean_token("yes"), None);
        assert_eq!(parse_boolean_token(""), None);
    }

    #[test]
    fn test_typed_reads() {
        let b = PropertyValue::Boolean(true);
        assert_eq!(bool::from_property_value(b.clone(), PropertyKind::Boolean), Some(true));
        assert_eq!(i64::from_property_value(b, PropertyKind::Boolean), None);

        let i = PropertyValue::Integer(200);
        assert_eq!(i64::from_property_value(i.clone(), PropertyKind::Integer), Some(200));
        assert_eq!(i32::from_property_value(i.clone(), PropertyKind::Integer), Some(200));
        assert_eq!(f64::from_property_value(i, PropertyKind::Integer), Some(200.0));

        let d = PropertyValue::Double(1.5);
        assert_eq!(i64::from_property_value(d.clone(), PropertyKind::Double), None);
        assert_eq!(f64::from_property_value(d, PropertyKind::Double), Some(1.5));
    }

    #[test]
    fn test_enum_reads_only_as_string() {
        let entry = PropertyValue::String("Center 50%".to_string());
        assert_eq!(
            String::from_property_value(entry.clone(), PropertyKind::Enum),
            Some("Center 50%".to_string())
        );
        assert_eq!(bool::from_property_value(entry, PropertyKind::Enum), None);
    }

    #[test]
    fn test_i32_overflow_is_a_mismatch() {
        let big = PropertyValue::Integer(30_000_000_000);
        assert_eq!(i32::from_property_value(big, PropertyKind::Integer), None);
    }

    #[test]
    fn test_conversions_and_display() {
        assert_eq!(PropertyValue::from(200), PropertyValue::Integer(200));
        assert_eq!(PropertyValue::from("Off"), PropertyValue::String("Off".to_string()));
        assert_eq!(PropertyValue::from(false).to_string(), "false");
        assert_eq!(PropertyValue::Double(0.5).type_name(), "double");
    }
}
