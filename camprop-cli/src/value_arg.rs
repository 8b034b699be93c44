//! Parsing property values given on the command line

use camprop_sdk::{parse_boolean_token, PropertyKind, PropertyValue};

/// Interpret a command-line value for a property of `kind`
///
/// String and enum properties take the text as given. Booleans go through
/// the boolean token table and numbers through numeric parsing. Text that
/// does not parse for the kind is passed on as a string so the registry
/// reports the type mismatch.
pub fn parse_value(raw: &str, kind: PropertyKind) -> PropertyValue {
    let trimmed = raw.trim();

    match kind {
        PropertyKind::Integer | PropertyKind::Double => {
            if let Ok(i) = trimmed.parse::<i64>() {
                return PropertyValue::Integer(i);
            }
            if let Ok(d) = trimmed.parse::<f64>() {
                if d.is_finite() {
                    return PropertyValue::Double(d);
                }
            }
        }
        PropertyKind::Boolean => {
            if let Some(b) = parse_boolean_token(trimmed) {
                return PropertyValue::Boolean(b);
            }
        }
        PropertyKind::String | PropertyKind::Enum | PropertyKind::Button => {}
    }

    PropertyValue::String(raw.to_string())
}
