use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of property kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Integer,
    Double,
    Boolean,
    String,
    Button,
    Enum,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 6] = [
        PropertyKind::Integer,
        PropertyKind::Double,
        PropertyKind::Boolean,
        PropertyKind::String,
        PropertyKind::Button,
        PropertyKind::Enum,
    ];

    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Integer => "integer",
            PropertyKind::Double => "double",
            PropertyKind::Boolean => "boolean",
            PropertyKind::String => "string",
            PropertyKind::Button => "button",
            PropertyKind::Enum => "enum",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, PropertyKind::Integer | PropertyKind::Double)
    }

    /// Buttons are the only kind without a stored value
    pub fn has_value(&self) -> bool {
        !matches!(self, PropertyKind::Button)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A kind string outside the closed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl FromStr for PropertyKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
