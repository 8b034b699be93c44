//! Full property surface of a device across lifecycle states
//!
//! The registry only ever reports what the device exposes in its current
//! state. A [`Survey`] is the caller-side union: descriptors gathered while
//! configured and while active, each tagged with where it was seen.

use std::collections::HashMap;

use property_registry::PropertyDescriptor;
use serde::Serialize;

/// When a property is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Listed both before and after the device starts
    Always,
    /// Only listed while active (software-emulated)
    ActiveOnly,
    /// Only listed while configured
    ConfiguredOnly,
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Availability::Always => "always",
            Availability::ActiveOnly => "active only",
            Availability::ConfiguredOnly => "configured only",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyEntry {
    pub availability: Availability,
    /// Snapshot taken in the last state the property was seen in
    pub descriptor: PropertyDescriptor,
}

/// Union of the property sets of both lifecycle states
#[derive(Debug, Clone, Default, Serialize)]
pub struct Survey {
    entries: Vec<SurveyEntry>,
}

impl Survey {
    /// Merge the two enumerations
    ///
    /// Order follows the active enumeration, followed by properties that
    /// disappeared on start in their configured order.
    pub fn merge(configured: Vec<PropertyDescriptor>, active: Vec<PropertyDescriptor>) -> Self {
        let mut configured: Vec<Option<PropertyDescriptor>> =
            configured.into_iter().map(Some).collect();
        let index: HashMap<String, usize> = configured
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.as_ref().map(|d| (d.name().to_string(), i)))
            .collect();

        let mut entries = Vec::with_capacity(active.len() + configured.len());
        for descriptor in active {
            let availability = match index.get(descriptor.name()) {
                Some(&i) => {
                    configured[i] = None;
                    Availability::Always
                }
                None => Availability::ActiveOnly,
            };
            entries.push(SurveyEntry {
                availability,
                descriptor,
            });
        }

        entries.extend(configured.into_iter().flatten().map(|descriptor| SurveyEntry {
            availability: Availability::ConfiguredOnly,
            descriptor,
        }));

        Self { entries }
    }

    pub fn entries(&self) -> &[SurveyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SurveyEntry> {
        self.entries.iter().find(|e| e.descriptor.name() == name)
    }

    /// Names with the given availability, in survey order
    pub fn names_with(&self, availability: Availability) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.availability == availability)
            .map(|e| e.descriptor.name())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use property_registry::PropertyInfo;

    fn button(name: &str) -> PropertyDescriptor {
        PropertyDescriptor::new(name, "", "", PropertyInfo::Button)
    }

    fn boolean(name: &str, value: bool) -> PropertyDescriptor {
        PropertyDescriptor::new(
            name,
            "Exposure",
            "Exposure",
            PropertyInfo::Boolean {
                value,
                default: true,
            },
        )
    }

    #[test]
    fn test_merge_tags_each_name() {
        let survey = Survey::merge(
            vec![button("A"), button("Gone")],
            vec![button("A"), boolean("Exposure Auto", true)],
        );

        assert_eq!(survey.len(), 3);
        assert_eq!(survey.names_with(Availability::Always), vec!["A"]);
        assert_eq!(survey.names_with(Availability::ActiveOnly), vec!["Exposure Auto"]);
        assert_eq!(survey.names_with(Availability::ConfiguredOnly), vec!["Gone"]);
    }

    #[test]
    fn test_merge_keeps_active_snapshot() {
        let survey = Survey::merge(
            vec![boolean("Exposure Auto", true)],
            vec![boolean("Exposure Auto", false)],
        );
        let entry = survey.get("Exposure Auto").unwrap();
        assert_eq!(entry.availability, Availability::Always);
        assert_eq!(entry.descriptor, boolean("Exposure Auto", false));
    }

    #[test]
    fn test_empty_survey() {
        let survey = Survey::merge(Vec::new(), Vec::new());
        assert!(survey.is_empty());
        assert!(survey.get("A").is_none());
    }

    #[test]
    fn test_serializes_with_snake_case_tags() {
        let survey = Survey::merge(Vec::new(), vec![button("Software Trigger")]);
        let json = serde_json::to_value(&survey).unwrap();
        assert_eq!(json["entries"][0]["availability"], "active_only");
        assert_eq!(json["entries"][0]["descriptor"]["kind"], "button");
    }
}
