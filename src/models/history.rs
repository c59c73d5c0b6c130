use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{HistorySeverity, HistoryStatus};
use super::lenient;

/// A past or ongoing condition reported by the patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistoryEntry {
    #[serde(default)]
    pub id: String,
    pub condition: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::blank_as_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::blank_as_none"
    )]
    pub diagnosis_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: HistoryStatus,
    #[serde(default)]
    pub severity: HistorySeverity,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::blank_as_none"
    )]
    pub treatment: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::blank_as_none"
    )]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_symptoms: Option<Vec<String>>,
}

impl MedicalHistoryEntry {
    pub fn new(condition: &str, status: HistoryStatus, severity: HistorySeverity) -> Self {
        Self {
            id: String::new(),
            condition: condition.to_string(),
            description: None,
            diagnosis_date: None,
            status,
            severity,
            treatment: None,
            notes: None,
            related_symptoms: None,
        }
    }
}

/// Per-status counts shown above the history list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total: usize,
    pub current: usize,
    pub chronic: usize,
    pub resolved: usize,
}
