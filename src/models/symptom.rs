use serde::{Deserialize, Deserializer, Serialize};

use super::lenient;

pub const SEVERITY_MIN: u8 = 1;
pub const SEVERITY_MAX: u8 = 10;

/// Category given to symptoms the patient types in by hand.
pub const CUSTOM_CATEGORY: &str = "Custom";

/// A patient-reported symptom. Owned by the `PatientProfile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "clamped_severity")]
    pub severity: u8,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    pub duration_hours: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
}

impl Symptom {
    /// Blank symptom for free-text entry.
    pub fn custom() -> Self {
        Self {
            id: String::new(),
            description: String::new(),
            severity: SEVERITY_MIN,
            duration_hours: 0,
            location: String::new(),
            category: CUSTOM_CATEGORY.to_string(),
        }
    }

    /// Symptom pre-filled from a catalog template: the template name becomes
    /// the description and its first common location the default location.
    pub fn from_template(template: &SymptomTemplate) -> Self {
        Self {
            id: String::new(),
            description: template.name.to_string(),
            severity: SEVERITY_MIN,
            duration_hours: 0,
            location: template
                .common_locations
                .first()
                .map(|l| l.to_string())
                .unwrap_or_default(),
            category: template.category.to_string(),
        }
    }

    pub fn set_severity(&mut self, severity: i64) {
        self.severity = clamp_severity(severity);
    }
}

pub fn clamp_severity(value: i64) -> u8 {
    value.clamp(SEVERITY_MIN as i64, SEVERITY_MAX as i64) as u8
}

fn clamped_severity<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    // Float-to-int `as` saturates (NaN becomes 0), clamping handles the rest.
    let value = f64::deserialize(deserializer)?;
    Ok(clamp_severity(value.round() as i64))
}

/// Static reference record used to pre-fill new symptoms and drive the
/// picker's search. Never user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub common_locations: &'static [&'static str],
    pub description: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADACHE: SymptomTemplate = SymptomTemplate {
        id: "headache",
        name: "Headache",
        category: "Head & Neck",
        common_locations: &["Forehead", "Temples"],
        description: "Pain or discomfort in the head or neck area",
    };

    #[test]
    fn custom_symptom_defaults() {
        let s = Symptom::custom();
        assert_eq!(s.category, "Custom");
        assert_eq!(s.severity, 1);
        assert_eq!(s.duration_hours, 0);
        assert!(s.description.is_empty());
    }

    #[test]
    fn template_prefills_first_location() {
        let s = Symptom::from_template(&HEADACHE);
        assert_eq!(s.description, "Headache");
        assert_eq!(s.location, "Forehead");
        assert_eq!(s.category, "Head & Neck");
    }

    #[test]
    fn template_without_locations_leaves_location_blank() {
        let bare = SymptomTemplate {
            common_locations: &[],
            ..HEADACHE
        };
        assert!(Symptom::from_template(&bare).location.is_empty());
    }

    #[test]
    fn severity_is_clamped() {
        let mut s = Symptom::custom();
        s.set_severity(42);
        assert_eq!(s.severity, 10);
        s.set_severity(-3);
        assert_eq!(s.severity, 1);
        s.set_severity(7);
        assert_eq!(s.severity, 7);
    }

    #[test]
    fn deserialize_clamps_out_of_range_values() {
        let json = r#"{"id":"symptom_1","description":"Cough","severity":14,
            "durationHours":-2,"location":"","category":"Respiratory"}"#;
        let s: Symptom = serde_json::from_str(json).unwrap();
        assert_eq!(s.severity, 10);
        assert_eq!(s.duration_hours, 0);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(Symptom::custom()).unwrap();
        assert!(json.get("durationHours").is_some());
        assert!(json.get("duration_hours").is_none());
    }
}
