//! In-memory record store for the three patient-owned collections.
//!
//! Symptoms live inside the patient profile; medical history and
//! medications are independent collections. Every operation is
//! infallible: unknown ids are silent no-ops.

pub mod collection;
pub mod records;

pub use collection::*;
pub use records::*;

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::models::{
    HistoryStats, HistoryStatus, MedicalHistoryEntry, Medication, PatientProfile, Symptom,
    SymptomTemplate,
};

/// Window around a scheduled time in which a dose counts as due now.
const DUE_WINDOW_MINUTES: i64 = 30;

/// One scheduled dose for today's reminder list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicationReminder {
    pub medication_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub time: String,
    /// Scheduled earlier today than `now`.
    pub is_past: bool,
    /// Within 30 minutes of `now`, either side.
    pub is_due: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    pub profile: PatientProfile,
    pub history: Collection<MedicalHistoryEntry>,
    pub medications: Collection<Medication>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Patient profile & symptoms ──────────────────────────

    pub fn set_age(&mut self, age: u32) {
        self.profile.age = age;
    }

    pub fn set_gender(&mut self, gender: &str) {
        self.profile.gender = gender.to_string();
    }

    pub fn symptoms(&self) -> &[Symptom] {
        self.profile.symptoms.list()
    }

    pub fn add_symptom(&mut self, symptom: Symptom) -> String {
        self.profile.symptoms.add(symptom)
    }

    pub fn add_custom_symptom(&mut self) -> String {
        self.add_symptom(Symptom::custom())
    }

    pub fn add_symptom_from_template(&mut self, template: &SymptomTemplate) -> String {
        self.add_symptom(Symptom::from_template(template))
    }

    pub fn update_symptom(&mut self, id: &str, patch: SymptomPatch) -> bool {
        self.profile.symptoms.update(id, patch)
    }

    pub fn remove_symptom(&mut self, id: &str) -> bool {
        self.profile.symptoms.remove(id)
    }

    /// Replace the profile wholesale with an empty one.
    pub fn reset_profile(&mut self) {
        self.profile = PatientProfile::default();
    }

    // ── Medical history ─────────────────────────────────────

    pub fn history(&self) -> &[MedicalHistoryEntry] {
        self.history.list()
    }

    pub fn add_history(&mut self, entry: MedicalHistoryEntry) -> String {
        self.history.add(entry)
    }

    pub fn update_history(&mut self, id: &str, patch: HistoryPatch) -> bool {
        self.history.update(id, patch)
    }

    pub fn remove_history(&mut self, id: &str) -> bool {
        self.history.remove(id)
    }

    /// Entries with the given status, or all entries for `None`.
    pub fn history_by_status(&self, status: Option<HistoryStatus>) -> Vec<&MedicalHistoryEntry> {
        self.history
            .iter()
            .filter(|h| status.map_or(true, |s| h.status == s))
            .collect()
    }

    pub fn history_stats(&self) -> HistoryStats {
        let count = |s: HistoryStatus| self.history.iter().filter(|h| h.status == s).count();
        HistoryStats {
            total: self.history.len(),
            current: count(HistoryStatus::Current),
            chronic: count(HistoryStatus::Chronic),
            resolved: count(HistoryStatus::Resolved),
        }
    }

    pub fn reset_history(&mut self) {
        self.history.clear();
    }

    // ── Medications ─────────────────────────────────────────

    pub fn medications(&self) -> &[Medication] {
        self.medications.list()
    }

    pub fn add_medication(&mut self, medication: Medication) -> String {
        self.medications.add(medication)
    }

    pub fn update_medication(&mut self, id: &str, patch: MedicationPatch) -> bool {
        self.medications.update(id, patch)
    }

    pub fn remove_medication(&mut self, id: &str) -> bool {
        self.medications.remove(id)
    }

    /// Record a dose as taken right now.
    pub fn mark_taken(&mut self, id: &str) -> bool {
        self.mark_taken_at(id, Utc::now())
    }

    pub fn mark_taken_at(&mut self, id: &str, taken_at: DateTime<Utc>) -> bool {
        self.medications.update(
            id,
            MedicationPatch {
                last_taken: Some(Some(taken_at)),
                ..Default::default()
            },
        )
    }

    /// Today's dose schedule for active medications with reminders on,
    /// one entry per scheduled time, ordered by time of day.
    pub fn reminders_at(&self, now: NaiveDateTime) -> Vec<MedicationReminder> {
        let now_hhmm = now.format("%H:%M").to_string();
        let now_hhmm = now_hhmm.as_str();
        let mut reminders: Vec<MedicationReminder> = self
            .medications
            .iter()
            .filter(|m| m.is_active && m.reminder_enabled)
            .flat_map(|m| {
                m.times.iter().map(move |time| MedicationReminder {
                    medication_id: m.id.clone(),
                    medication_name: m.name.clone(),
                    dosage: m.dosage.clone(),
                    time: time.clone(),
                    is_past: time.as_str() < now_hhmm,
                    is_due: is_within_due_window(time, now),
                })
            })
            .collect();
        reminders.sort_by(|a, b| a.time.cmp(&b.time));
        reminders
    }

    pub fn reset_medications(&mut self) {
        self.medications.clear();
    }
}

fn is_within_due_window(time: &str, now: NaiveDateTime) -> bool {
    match NaiveTime::parse_from_str(time, "%H:%M") {
        Ok(t) => {
            let scheduled = now.date().and_time(t);
            (scheduled - now).num_minutes().abs() < DUE_WINDOW_MINUTES
        }
        Err(_) => false,
    }
}
