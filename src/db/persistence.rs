//! Write-through persistence of the record store, one JSON blob per
//! collection under a fixed key.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{DatabaseError, KeyValueStore};
use crate::models::{MedicalHistoryEntry, Medication, PatientProfile};
use crate::store::{Collection, RecordStore};

/// Patient profile with its embedded symptom list.
pub const PROFILE_KEY: &str = "medicalSymptomChecker";
pub const HISTORY_KEY: &str = "medicalHistory";
pub const MEDICATIONS_KEY: &str = "medications";

/// Load all three collections. A missing key yields an empty collection;
/// an unreadable blob is logged and that collection starts empty.
pub fn load_records(kv: &dyn KeyValueStore) -> RecordStore {
    RecordStore {
        profile: load_or_default(kv, PROFILE_KEY),
        history: load_or_default(kv, HISTORY_KEY),
        medications: load_or_default(kv, MEDICATIONS_KEY),
    }
}

pub fn save_profile(kv: &dyn KeyValueStore, profile: &PatientProfile) -> Result<(), DatabaseError> {
    save_json(kv, PROFILE_KEY, profile)
}

pub fn save_history(
    kv: &dyn KeyValueStore,
    history: &Collection<MedicalHistoryEntry>,
) -> Result<(), DatabaseError> {
    save_json(kv, HISTORY_KEY, history)
}

pub fn save_medications(
    kv: &dyn KeyValueStore,
    medications: &Collection<Medication>,
) -> Result<(), DatabaseError> {
    save_json(kv, MEDICATIONS_KEY, medications)
}

pub fn clear_key(kv: &dyn KeyValueStore, key: &str) -> Result<(), DatabaseError> {
    kv.remove(key)
}

fn save_json<T: Serialize + ?Sized>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), DatabaseError> {
    let json = serde_json::to_string(value)?;
    kv.set(key, &json)
}

fn load_json<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, DatabaseError> {
    match kv.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn load_or_default<T: DeserializeOwned + Default>(kv: &dyn KeyValueStore, key: &str) -> T {
    match load_json(kv, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::error!(key, error = %e, "Failed to load saved records, starting empty");
            T::default()
        }
    }
}
