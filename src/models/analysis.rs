use serde::{Deserialize, Serialize};

use super::enums::{UrgencyCategory, UrgencyLevel};

pub const FALLBACK_MESSAGE: &str =
    "Unable to complete analysis at this time. Please consult with a healthcare professional.";

pub const FALLBACK_RECOMMENDATIONS: [&str; 5] = [
    "Contact your doctor if symptoms persist",
    "Monitor your temperature regularly",
    "Stay hydrated",
    "Rest and avoid exertion",
    "Use over-the-counter fever medication if advised",
];

pub const STANDARD_DISCLAIMER: &str =
    "This analysis is for informational purposes only and does not replace professional medical advice.";

/// Urgency assessment returned by the remote model.
///
/// `kind` and `urgency_level` stay plain strings: whatever the model sends
/// is passed through untouched. Use [`AnalysisResult::category`] and
/// [`AnalysisResult::level`] for the documented closed sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_conditions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_alerts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_insights: Option<Vec<String>>,
    pub disclaimer: String,
}

impl AnalysisResult {
    /// The fixed result returned whenever analysis cannot be completed.
    pub fn fallback() -> Self {
        Self {
            kind: UrgencyCategory::Monitor.as_str().to_string(),
            message: FALLBACK_MESSAGE.to_string(),
            recommendations: FALLBACK_RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
            possible_conditions: Some(Vec::new()),
            urgency_level: Some(UrgencyLevel::Medium.as_str().to_string()),
            medication_alerts: None,
            history_insights: None,
            disclaimer: STANDARD_DISCLAIMER.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }

    /// `None` when the model sent a label outside urgent/monitor/routine.
    pub fn category(&self) -> Option<UrgencyCategory> {
        self.kind.parse().ok()
    }

    /// `None` when absent or outside low/medium/high.
    pub fn level(&self) -> Option<UrgencyLevel> {
        self.urgency_level.as_deref()?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_constants() {
        let f = AnalysisResult::fallback();
        assert_eq!(f.kind, "monitor");
        assert_eq!(f.urgency_level.as_deref(), Some("medium"));
        assert_eq!(
            f.message,
            "Unable to complete analysis at this time. Please consult with a healthcare professional."
        );
        assert_eq!(
            f.recommendations,
            vec![
                "Contact your doctor if symptoms persist",
                "Monitor your temperature regularly",
                "Stay hydrated",
                "Rest and avoid exertion",
                "Use over-the-counter fever medication if advised",
            ]
        );
        assert_eq!(f.possible_conditions, Some(vec![]));
        assert_eq!(f.disclaimer, STANDARD_DISCLAIMER);
        assert!(f.is_fallback());
    }

    #[test]
    fn typed_views_accept_documented_labels() {
        let mut r = AnalysisResult::fallback();
        r.kind = "urgent".into();
        r.urgency_level = Some("high".into());
        assert_eq!(r.category(), Some(UrgencyCategory::Urgent));
        assert_eq!(r.level(), Some(UrgencyLevel::High));
        assert!(!r.is_fallback());
    }

    #[test]
    fn typed_views_reject_unknown_labels() {
        let mut r = AnalysisResult::fallback();
        r.kind = "emergency".into();
        r.urgency_level = Some("critical".into());
        assert_eq!(r.category(), None);
        assert_eq!(r.level(), None);
    }

    #[test]
    fn serializes_type_key() {
        let json = serde_json::to_value(AnalysisResult::fallback()).unwrap();
        assert_eq!(json["type"], "monitor");
        assert_eq!(json["urgencyLevel"], "medium");
        assert!(json.get("medicationAlerts").is_none());
    }
}
