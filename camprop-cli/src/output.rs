//! Text rendering of descriptors and surveys

use std::fmt::Write;

use camprop_sdk::{PropertyDescriptor, PropertyInfo, Survey};

/// One listing entry, in the capture library's classic listing layout
///
/// Enum entries follow on their own tab-indented lines.
pub fn format_descriptor(descriptor: &PropertyDescriptor) -> String {
    let name = descriptor.name();
    let grouping = format!("{} - {}", descriptor.category(), descriptor.group());

    match descriptor.info() {
        PropertyInfo::Integer {
            value,
            minimum,
            maximum,
            default,
            ..
        } => format!(
            "{}(integer) value: {} default: {} min: {} max: {} grouping: {}",
            name, value, default, minimum, maximum, grouping
        ),
        PropertyInfo::Double {
            value,
            minimum,
            maximum,
            default,
            ..
        } => format!(
            "{}(double) value: {} default: {} min: {} max: {} grouping: {}",
            name, value, default, minimum, maximum, grouping
        ),
        PropertyInfo::Boolean { value, default } => format!(
            "{}(boolean) value: {} default: {} grouping: {}",
            name, value, default, grouping
        ),
        PropertyInfo::String { value, default } => format!(
            "{}(string) value: {} default: {} grouping: {}",
            name, value, default, grouping
        ),
        PropertyInfo::Button => format!("{}(button) grouping: {}", name, grouping),
        PropertyInfo::Enum {
            value,
            default,
            entries,
        } => {
            let mut out = format!(
                "{}(enum) value: {} default: {} grouping: {}\nEntries:",
                name, value, default, grouping
            );
            for entry in entries {
                // Writing to a String cannot fail
                let _ = write!(out, "\n\t{}", entry);
            }
            out
        }
    }
}

pub fn format_survey(survey: &Survey) -> String {
    survey
        .entries()
        .iter()
        .map(|entry| format!("[{}] {}", entry.availability, format_descriptor(&entry.descriptor)))
        .collect::<Vec<_>>()
        .join("\n")
}
