use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Frequency;
use super::lenient;

/// Time given to the first dose of a newly created medication.
pub const DEFAULT_FIRST_TIME: &str = "08:00";
/// Time used to pad the schedule when the frequency grows.
pub const DEFAULT_PAD_TIME: &str = "12:00";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: Frequency,
    /// Times of day ("HH:MM"); length always matches `frequency.dose_count()`.
    #[serde(default)]
    pub times: Vec<String>,
    pub start_date: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::blank_as_none"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::blank_as_none"
    )]
    pub notes: Option<String>,
    #[serde(default = "enabled")]
    pub is_active: bool,
    #[serde(default = "enabled")]
    pub reminder_enabled: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::blank_as_none"
    )]
    pub last_taken: Option<DateTime<Utc>>,
}

fn enabled() -> bool {
    true
}

impl Medication {
    /// New active medication with reminders on and a schedule sized to
    /// `frequency`.
    pub fn new(name: &str, dosage: &str, frequency: Frequency, start_date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            dosage: dosage.to_string(),
            frequency,
            times: reconcile_times(vec![DEFAULT_FIRST_TIME.to_string()], frequency),
            start_date,
            end_date: None,
            notes: None,
            is_active: true,
            reminder_enabled: true,
            last_taken: None,
        }
    }

    /// Switch frequency, resizing the schedule to match.
    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
        self.sync_times();
    }

    /// Truncate or pad `times` to the count implied by `frequency`.
    pub fn sync_times(&mut self) {
        let times = std::mem::take(&mut self.times);
        self.times = reconcile_times(times, self.frequency);
    }
}

/// Resize a schedule to the frequency's dose count, keeping existing entries
/// left to right and padding with `DEFAULT_PAD_TIME`.
pub fn reconcile_times(mut times: Vec<String>, frequency: Frequency) -> Vec<String> {
    let count = frequency.dose_count();
    times.truncate(count);
    while times.len() < count {
        times.push(DEFAULT_PAD_TIME.to_string());
    }
    times
}
