//! One patient's working session: the record store, its durable backing,
//! and the analysis request lifecycle.
//!
//! Every mutation is written through to the key-value store immediately.
//! A failed write is logged and the in-memory change is kept.

use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::analysis::{
    ActiveAnalysis, AnalysisError, AnalysisGate, ChatTransport, OpenRouterTransport,
    SymptomAnalyzer,
};
use crate::config::AnalysisConfig;
use crate::db::{self, DatabaseError, KeyValueStore, SqliteKvStore};
use crate::models::{AnalysisResult, MedicalHistoryEntry, Medication, Symptom, SymptomTemplate};
use crate::store::{HistoryPatch, MedicationPatch, MedicationReminder, RecordStore, SymptomPatch};

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Failed to create data directory: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Why an analysis request was refused before any network call.
/// Messages are shown to the user as-is.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisRefusal {
    #[error("Please add at least one symptom before analyzing.")]
    NoSymptoms,

    #[error("Please provide your age for a more accurate analysis.")]
    MissingAge,

    #[error("Please select your gender for a more accurate analysis.")]
    MissingGender,

    #[error("API key is missing. Please set OPENROUTER_API_KEY in your environment.")]
    MissingCredential,

    #[error("An analysis is already in progress.")]
    AlreadyAnalyzing,
}

// ═══════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════

pub struct Session<S: KeyValueStore, T: ChatTransport> {
    records: RecordStore,
    kv: S,
    analyzer: SymptomAnalyzer<T>,
    gate: AnalysisGate,
    latest: Mutex<Option<AnalysisResult>>,
}

impl Session<SqliteKvStore, OpenRouterTransport> {
    /// Open the SQLite-backed session at `path`, creating parent
    /// directories as needed.
    pub fn open_at(path: &Path, config: AnalysisConfig) -> Result<Self, SessionError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let kv = SqliteKvStore::open(path)?;
        let analyzer = SymptomAnalyzer::from_config(config)?;
        Ok(Self::open(kv, analyzer))
    }
}

impl<S: KeyValueStore, T: ChatTransport> Session<S, T> {
    /// Load all saved collections from `kv`.
    pub fn open(kv: S, analyzer: SymptomAnalyzer<T>) -> Self {
        let records = db::load_records(&kv);
        tracing::info!(
            symptoms = records.profile.symptoms.len(),
            history = records.history.len(),
            medications = records.medications.len(),
            "Session opened"
        );
        Self {
            records,
            kv,
            analyzer,
            gate: AnalysisGate::new(),
            latest: Mutex::new(None),
        }
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn analyzer(&self) -> &SymptomAnalyzer<T> {
        &self.analyzer
    }

    pub fn gate(&self) -> &AnalysisGate {
        &self.gate
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    // ── Patient profile & symptoms ──────────────────────────

    pub fn set_age(&mut self, age: u32) {
        self.records.set_age(age);
        self.persist_profile();
    }

    pub fn set_gender(&mut self, gender: &str) {
        self.records.set_gender(gender);
        self.persist_profile();
    }

    pub fn add_symptom(&mut self, symptom: Symptom) -> String {
        let id = self.records.add_symptom(symptom);
        self.persist_profile();
        id
    }

    pub fn add_custom_symptom(&mut self) -> String {
        let id = self.records.add_custom_symptom();
        self.persist_profile();
        id
    }

    pub fn add_symptom_from_template(&mut self, template: &SymptomTemplate) -> String {
        let id = self.records.add_symptom_from_template(template);
        self.persist_profile();
        id
    }

    pub fn update_symptom(&mut self, id: &str, patch: SymptomPatch) -> bool {
        let changed = self.records.update_symptom(id, patch);
        if changed {
            self.persist_profile();
        }
        changed
    }

    pub fn remove_symptom(&mut self, id: &str) -> bool {
        let removed = self.records.remove_symptom(id);
        if removed {
            self.persist_profile();
        }
        removed
    }

    /// Clear the profile and the latest analysis result.
    pub fn reset_profile(&mut self) {
        self.records.reset_profile();
        self.set_latest(None);
        self.clear(db::PROFILE_KEY);
    }

    // ── Medical history ─────────────────────────────────────

    pub fn add_history(&mut self, entry: MedicalHistoryEntry) -> String {
        let id = self.records.add_history(entry);
        self.persist_history();
        id
    }

    pub fn update_history(&mut self, id: &str, patch: HistoryPatch) -> bool {
        let changed = self.records.update_history(id, patch);
        if changed {
            self.persist_history();
        }
        changed
    }

    pub fn remove_history(&mut self, id: &str) -> bool {
        let removed = self.records.remove_history(id);
        if removed {
            self.persist_history();
        }
        removed
    }

    pub fn reset_history(&mut self) {
        self.records.reset_history();
        self.clear(db::HISTORY_KEY);
    }

    // ── Medications ─────────────────────────────────────────

    pub fn add_medication(&mut self, medication: Medication) -> String {
        let id = self.records.add_medication(medication);
        self.persist_medications();
        id
    }

    pub fn update_medication(&mut self, id: &str, patch: MedicationPatch) -> bool {
        let changed = self.records.update_medication(id, patch);
        if changed {
            self.persist_medications();
        }
        changed
    }

    pub fn remove_medication(&mut self, id: &str) -> bool {
        let removed = self.records.remove_medication(id);
        if removed {
            self.persist_medications();
        }
        removed
    }

    pub fn mark_taken(&mut self, id: &str) -> bool {
        let changed = self.records.mark_taken(id);
        if changed {
            self.persist_medications();
        }
        changed
    }

    pub fn reminders_at(&self, now: NaiveDateTime) -> Vec<MedicationReminder> {
        self.records.reminders_at(now)
    }

    pub fn reset_medications(&mut self) {
        self.records.reset_medications();
        self.clear(db::MEDICATIONS_KEY);
    }

    // ── Analysis ────────────────────────────────────────────

    /// Validate the profile, then run one analysis.
    ///
    /// Refusals happen before any network call and leave the previous
    /// result in place. Once the request starts the previous result is
    /// cleared, and the outcome (model result or fallback) replaces it.
    pub fn request_analysis(&self) -> Result<AnalysisResult, AnalysisRefusal> {
        let profile = &self.records.profile;
        if profile.symptoms.is_empty() {
            return Err(AnalysisRefusal::NoSymptoms);
        }
        if !profile.has_age() {
            return Err(AnalysisRefusal::MissingAge);
        }
        if !profile.has_gender() {
            return Err(AnalysisRefusal::MissingGender);
        }
        if !self.analyzer.has_credential() {
            return Err(AnalysisRefusal::MissingCredential);
        }

        let _guard = self
            .gate
            .try_acquire(&self.analyzer.config().model)
            .ok_or(AnalysisRefusal::AlreadyAnalyzing)?;

        self.set_latest(None);
        let result = self.analyzer.analyze_records(&self.records);
        self.set_latest(Some(result.clone()));
        Ok(result)
    }

    pub fn latest_result(&self) -> Option<AnalysisResult> {
        self.latest.lock().ok()?.clone()
    }

    pub fn is_analyzing(&self) -> bool {
        self.gate.is_analyzing()
    }

    pub fn active_analysis(&self) -> Option<ActiveAnalysis> {
        self.gate.current()
    }

    // ── Internal ────────────────────────────────────────────

    fn set_latest(&self, result: Option<AnalysisResult>) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = result;
        }
    }

    fn persist_profile(&self) {
        log_write(db::PROFILE_KEY, db::save_profile(&self.kv, &self.records.profile));
    }

    fn persist_history(&self) {
        log_write(db::HISTORY_KEY, db::save_history(&self.kv, &self.records.history));
    }

    fn persist_medications(&self) {
        log_write(
            db::MEDICATIONS_KEY,
            db::save_medications(&self.kv, &self.records.medications),
        );
    }

    fn clear(&self, key: &str) {
        log_write(key, db::clear_key(&self.kv, key));
    }
}

fn log_write(key: &str, result: Result<(), DatabaseError>) {
    if let Err(e) = result {
        tracing::error!(key, error = %e, "Failed to save records");
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MockTransport;
    use crate::catalog;
    use crate::db::MemoryKvStore;
    use crate::models::{Frequency, HistorySeverity, HistoryStatus};
    use chrono::NaiveDate;

    const HEADACHE_REPLY: &str = r#"{"type":"monitor","message":"Likely tension headache","recommendations":["Rest","Hydrate","See a doctor if worsening"],"possibleConditions":["Tension headache","Migraine"],"urgencyLevel":"medium","disclaimer":"Not medical advice."}"#;

    type TestSession = Session<MemoryKvStore, MockTransport>;

    fn session_with(
        kv: MemoryKvStore,
        config: AnalysisConfig,
        transport: MockTransport,
    ) -> TestSession {
        Session::open(kv, SymptomAnalyzer::new(config, transport))
    }

    fn session(transport: MockTransport) -> TestSession {
        session_with(
            MemoryKvStore::new(),
            AnalysisConfig::with_api_key("sk-test"),
            transport,
        )
    }

    fn add_headache(session: &mut TestSession) -> String {
        let mut s = Symptom::custom();
        s.description = "Headache".into();
        s.severity = 8;
        s.duration_hours = 3;
        s.location = "Forehead".into();
        s.category = "Head & Neck".into();
        session.add_symptom(s)
    }

    fn ready_session(transport: MockTransport) -> TestSession {
        let mut session = session(transport);
        session.set_age(30);
        session.set_gender("Female");
        add_headache(&mut session);
        session
    }

    #[test]
    fn refuses_without_symptoms() {
        let mut session = session(MockTransport::with_content(HEADACHE_REPLY));
        session.set_age(30);
        session.set_gender("Female");
        assert_eq!(session.request_analysis(), Err(AnalysisRefusal::NoSymptoms));
        assert_eq!(session.analyzer().transport().call_count(), 0);
    }

    #[test]
    fn refuses_without_age_then_gender() {
        let mut session = session(MockTransport::with_content(HEADACHE_REPLY));
        add_headache(&mut session);
        assert_eq!(session.request_analysis(), Err(AnalysisRefusal::MissingAge));

        session.set_age(30);
        assert_eq!(session.request_analysis(), Err(AnalysisRefusal::MissingGender));

        session.set_gender("   ");
        assert_eq!(session.request_analysis(), Err(AnalysisRefusal::MissingGender));
        assert_eq!(session.analyzer().transport().call_count(), 0);
    }

    #[test]
    fn refuses_without_credential_after_input_checks() {
        let mut session = session_with(
            MemoryKvStore::new(),
            AnalysisConfig::default(),
            MockTransport::with_content(HEADACHE_REPLY),
        );
        assert_eq!(session.request_analysis(), Err(AnalysisRefusal::NoSymptoms));

        session.set_age(30);
        session.set_gender("Female");
        add_headache(&mut session);
        assert_eq!(session.request_analysis(), Err(AnalysisRefusal::MissingCredential));
        assert_eq!(session.analyzer().transport().call_count(), 0);
        assert!(session.latest_result().is_none());
    }

    #[test]
    fn headache_scenario_returns_model_result() {
        let session = ready_session(MockTransport::with_content(HEADACHE_REPLY));
        let result = session.request_analysis().unwrap();
        assert_eq!(result.kind, "monitor");
        assert_eq!(result.message, "Likely tension headache");
        assert_eq!(result.urgency_level.as_deref(), Some("medium"));
        assert_eq!(session.latest_result(), Some(result));
        assert!(!session.is_analyzing());
        assert_eq!(session.analyzer().transport().call_count(), 1);

        let (_, request) = session.analyzer().transport().last_request().unwrap();
        assert!(request.messages[1].content.contains(
            "- Headache (Severity: 8/10, Duration: 3 hours, Location: Forehead)"
        ));
    }

    #[test]
    fn headache_scenario_server_error_gives_fallback() {
        let session = ready_session(MockTransport::failing(AnalysisError::Status {
            status: 500,
            body: String::new(),
        }));
        let result = session.request_analysis().unwrap();
        assert!(result.is_fallback());
        assert_eq!(session.latest_result(), Some(AnalysisResult::fallback()));
    }

    #[test]
    fn busy_gate_refuses_second_request() {
        let session = ready_session(MockTransport::with_content(HEADACHE_REPLY));
        let _held = session.gate().try_acquire("other").unwrap();
        assert!(session.is_analyzing());
        assert_eq!(session.request_analysis(), Err(AnalysisRefusal::AlreadyAnalyzing));
        assert_eq!(session.analyzer().transport().call_count(), 0);
    }

    #[test]
    fn gate_reopens_after_request() {
        let session = ready_session(MockTransport::with_content(HEADACHE_REPLY));
        session.request_analysis().unwrap();
        assert!(session.active_analysis().is_none());
        session.request_analysis().unwrap();
        assert_eq!(session.analyzer().transport().call_count(), 2);
    }

    #[test]
    fn refusal_keeps_previous_result() {
        let mut session = ready_session(MockTransport::with_content(HEADACHE_REPLY));
        session.request_analysis().unwrap();
        let id = session.records().symptoms()[0].id.clone();
        session.remove_symptom(&id);
        assert_eq!(session.request_analysis(), Err(AnalysisRefusal::NoSymptoms));
        assert!(session.latest_result().is_some());
    }

    #[test]
    fn reset_profile_clears_result_and_key() {
        let mut session = ready_session(MockTransport::with_content(HEADACHE_REPLY));
        session.request_analysis().unwrap();
        session.reset_profile();
        assert!(session.latest_result().is_none());
        assert!(session.records().symptoms().is_empty());
        assert_eq!(session.kv().get(db::PROFILE_KEY).unwrap(), None);
    }

    #[test]
    fn mutations_write_through() {
        let mut session = session(MockTransport::with_content(HEADACHE_REPLY));
        session.set_age(42);
        let template = catalog::find_by_name("Fever").unwrap();
        session.add_symptom_from_template(template);
        session.add_history(MedicalHistoryEntry::new(
            "Asthma",
            HistoryStatus::Current,
            HistorySeverity::Mild,
        ));
        let med_id = session.add_medication(Medication::new(
            "Ibuprofen",
            "200mg",
            Frequency::Thrice,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ));
        assert!(session.mark_taken(&med_id));

        let reloaded = db::load_records(session.kv());
        assert_eq!(&reloaded, session.records());
        assert_eq!(reloaded.profile.age, 42);
        assert_eq!(reloaded.symptoms()[0].description, "Fever");
        assert!(reloaded.medications()[0].last_taken.is_some());
    }

    #[test]
    fn reopen_restores_saved_records() {
        let kv = MemoryKvStore::new();
        let analyzer = || {
            SymptomAnalyzer::new(
                AnalysisConfig::with_api_key("sk-test"),
                MockTransport::with_content(HEADACHE_REPLY),
            )
        };
        {
            let mut session = Session::open(&kv, analyzer());
            session.set_gender("Male");
            session.add_custom_symptom();
        }
        let reopened = Session::open(&kv, analyzer());
        assert_eq!(reopened.records().profile.gender, "Male");
        assert_eq!(reopened.records().symptoms().len(), 1);
    }

    #[test]
    fn unknown_ids_do_not_write() {
        let mut session = session(MockTransport::with_content(HEADACHE_REPLY));
        assert!(!session.remove_history("missing"));
        assert!(!session.update_medication("missing", MedicationPatch::default()));
        assert!(session.kv().is_empty());
    }

    #[test]
    fn reset_collections_remove_keys() {
        let mut session = session(MockTransport::with_content(HEADACHE_REPLY));
        session.add_history(MedicalHistoryEntry::new(
            "Asthma",
            HistoryStatus::Current,
            HistorySeverity::Mild,
        ));
        session.add_medication(Medication::new(
            "Ibuprofen",
            "200mg",
            Frequency::Once,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ));
        session.reset_history();
        session.reset_medications();
        assert!(session.records().history().is_empty());
        assert!(session.records().medications().is_empty());
        assert_eq!(session.kv().get(db::HISTORY_KEY).unwrap(), None);
        assert_eq!(session.kv().get(db::MEDICATIONS_KEY).unwrap(), None);
    }

    #[test]
    fn open_at_creates_sqlite_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("records.db");
        {
            let mut session = Session::open_at(&path, AnalysisConfig::default()).unwrap();
            session.set_age(55);
        }
        let session = Session::open_at(&path, AnalysisConfig::default()).unwrap();
        assert_eq!(session.records().profile.age, 55);
    }
}
