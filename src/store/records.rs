use chrono::{DateTime, NaiveDate, Utc};

use super::collection::Record;
use crate::models::lenient::clear_blank;
use crate::models::{
    clamp_severity, Frequency, HistorySeverity, HistoryStatus, MedicalHistoryEntry, Medication,
    Symptom,
};

// ═══════════════════════════════════════════
// Patches: partial updates from form edits
// ═══════════════════════════════════════════
//
// `None` leaves a field untouched. For optional record fields the inner
// `Option` is the new value, so `Some(None)` clears it.

#[derive(Debug, Clone, Default)]
pub struct SymptomPatch {
    pub description: Option<String>,
    /// Clamped to 1..=10 when applied.
    pub severity: Option<i64>,
    pub duration_hours: Option<u32>,
    pub location: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryPatch {
    pub condition: Option<String>,
    pub description: Option<Option<String>>,
    pub diagnosis_date: Option<Option<NaiveDate>>,
    pub status: Option<HistoryStatus>,
    pub severity: Option<HistorySeverity>,
    pub treatment: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub related_symptoms: Option<Option<Vec<String>>>,
}

#[derive(Debug, Clone, Default)]
pub struct MedicationPatch {
    pub name: Option<String>,
    pub dosage: Option<String>,
    /// Changing frequency resizes `times` to the new dose count.
    pub frequency: Option<Frequency>,
    pub times: Option<Vec<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub reminder_enabled: Option<bool>,
    pub last_taken: Option<Option<DateTime<Utc>>>,
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

// ═══════════════════════════════════════════
// Record impls
// ═══════════════════════════════════════════

impl Record for Symptom {
    type Patch = SymptomPatch;
    const ID_PREFIX: &'static str = "symptom";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: SymptomPatch) {
        set(&mut self.description, patch.description);
        if let Some(severity) = patch.severity {
            self.set_severity(severity);
        }
        set(&mut self.duration_hours, patch.duration_hours);
        set(&mut self.location, patch.location);
        set(&mut self.category, patch.category);
    }

    fn normalize(&mut self) {
        self.severity = clamp_severity(self.severity as i64);
    }
}

impl Record for MedicalHistoryEntry {
    type Patch = HistoryPatch;
    const ID_PREFIX: &'static str = "history";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: HistoryPatch) {
        set(&mut self.condition, patch.condition);
        set(&mut self.description, patch.description);
        set(&mut self.diagnosis_date, patch.diagnosis_date);
        set(&mut self.status, patch.status);
        set(&mut self.severity, patch.severity);
        set(&mut self.treatment, patch.treatment);
        set(&mut self.notes, patch.notes);
        set(&mut self.related_symptoms, patch.related_symptoms);
    }

    fn normalize(&mut self) {
        clear_blank(&mut self.description);
        clear_blank(&mut self.treatment);
        clear_blank(&mut self.notes);
    }
}

impl Record for Medication {
    type Patch = MedicationPatch;
    const ID_PREFIX: &'static str = "med";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: MedicationPatch) {
        set(&mut self.name, patch.name);
        set(&mut self.dosage, patch.dosage);
        set(&mut self.times, patch.times);
        set(&mut self.frequency, patch.frequency);
        set(&mut self.start_date, patch.start_date);
        set(&mut self.end_date, patch.end_date);
        set(&mut self.notes, patch.notes);
        set(&mut self.is_active, patch.is_active);
        set(&mut self.reminder_enabled, patch.reminder_enabled);
        set(&mut self.last_taken, patch.last_taken);
    }

    fn normalize(&mut self) {
        clear_blank(&mut self.notes);
        self.sync_times();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Collection;

    fn med(frequency: Frequency) -> Medication {
        Medication::new(
            "Amoxicillin",
            "500mg",
            frequency,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
    }

    fn severity(value: i64) -> SymptomPatch {
        SymptomPatch {
            severity: Some(value),
            ..Default::default()
        }
    }

    fn frequency(value: Frequency) -> MedicationPatch {
        MedicationPatch {
            frequency: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn symptom_patch_clamps_severity() {
        let mut c = Collection::new();
        let id = c.add(Symptom::custom());
        c.update(&id, severity(11));
        assert_eq!(c.get(&id).unwrap().severity, 10);
        c.update(&id, severity(0));
        assert_eq!(c.get(&id).unwrap().severity, 1);
    }

    #[test]
    fn symptom_patch_touches_only_given_fields() {
        let mut c = Collection::new();
        let id = c.add(Symptom::custom());
        c.update(
            &id,
            SymptomPatch {
                description: Some("Back ache".into()),
                duration_hours: Some(12),
                ..Default::default()
            },
        );
        let s = c.get(&id).unwrap();
        assert_eq!(s.description, "Back ache");
        assert_eq!(s.duration_hours, 12);
        assert_eq!(s.category, "Custom");
        assert!(id.starts_with("symptom_"));
    }

    #[test]
    fn history_patch_can_clear_optional_fields() {
        let mut c = Collection::new();
        let mut entry =
            MedicalHistoryEntry::new("Asthma", HistoryStatus::Chronic, HistorySeverity::Moderate);
        entry.treatment = Some("Inhaler".into());
        let id = c.add(entry);
        c.update(
            &id,
            HistoryPatch {
                treatment: Some(None),
                status: Some(HistoryStatus::Resolved),
                ..Default::default()
            },
        );
        let e = c.get(&id).unwrap();
        assert!(e.treatment.is_none());
        assert_eq!(e.status, HistoryStatus::Resolved);
        assert_eq!(e.condition, "Asthma");
    }

    #[test]
    fn blank_optional_text_is_stored_as_none() {
        let mut history = Collection::new();
        let mut entry =
            MedicalHistoryEntry::new("Asthma", HistoryStatus::Current, HistorySeverity::Mild);
        entry.description = Some("   ".into());
        entry.notes = Some("  uses spacer ".into());
        let id = history.add(entry);
        history.update(
            &id,
            HistoryPatch {
                treatment: Some(Some(String::new())),
                ..Default::default()
            },
        );
        let e = history.get(&id).unwrap();
        assert!(e.description.is_none());
        assert!(e.treatment.is_none());
        assert_eq!(e.notes.as_deref(), Some("  uses spacer "));

        let mut meds = Collection::new();
        let id = meds.add(med(Frequency::Once));
        meds.update(
            &id,
            MedicationPatch {
                notes: Some(Some(String::new())),
                ..Default::default()
            },
        );
        assert!(meds.get(&id).unwrap().notes.is_none());
    }

    #[test]
    fn add_reconciles_medication_times() {
        let mut c = Collection::new();
        let mut m = med(Frequency::Twice);
        m.times = vec!["06:00".into(), "12:00".into(), "18:00".into()];
        let id = c.add(m);
        assert_eq!(c.get(&id).unwrap().times, vec!["06:00", "12:00"]);
    }

    #[test]
    fn frequency_change_preserves_existing_times() {
        let mut c = Collection::new();
        let mut m = med(Frequency::Thrice);
        m.times = vec!["07:00".into(), "13:00".into(), "19:00".into()];
        let id = c.add(m);

        c.update(&id, frequency(Frequency::Twice));
        assert_eq!(c.get(&id).unwrap().times, vec!["07:00", "13:00"]);

        c.update(&id, frequency(Frequency::FourTimes));
        assert_eq!(
            c.get(&id).unwrap().times,
            vec!["07:00", "13:00", "12:00", "12:00"]
        );
    }

    #[test]
    fn times_patch_is_sized_to_frequency() {
        let mut c = Collection::new();
        let id = c.add(med(Frequency::Twice));
        c.update(
            &id,
            MedicationPatch {
                times: Some(vec!["09:30".into()]),
                ..Default::default()
            },
        );
        assert_eq!(c.get(&id).unwrap().times, vec!["09:30", "12:00"]);
    }

    #[test]
    fn every_frequency_change_matches_dose_count() {
        let all = [
            Frequency::Once,
            Frequency::Twice,
            Frequency::Thrice,
            Frequency::FourTimes,
            Frequency::AsNeeded,
        ];
        let mut c = Collection::new();
        let id = c.add(med(Frequency::Once));
        for from in all {
            for to in all {
                c.update(&id, frequency(from));
                let before = c.get(&id).unwrap().times.clone();
                c.update(&id, frequency(to));
                let after = &c.get(&id).unwrap().times;
                assert_eq!(after.len(), to.dose_count());
                let kept = before.len().min(after.len());
                assert_eq!(&after[..kept], &before[..kept]);
            }
        }
    }
}
