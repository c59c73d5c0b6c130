use serde::{Deserialize, Serialize};

use super::lenient;
use super::symptom::Symptom;
use crate::store::Collection;

/// The session's patient: demographics plus the ordered symptom list.
/// `age == 0` and an empty `gender` mean "not provided yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(default, deserialize_with = "lenient::non_negative")]
    pub age: u32,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub symptoms: Collection<Symptom>,
}

impl PatientProfile {
    pub fn has_age(&self) -> bool {
        self.age > 0
    }

    pub fn has_gender(&self) -> bool {
        !self.gender.trim().is_empty()
    }
}
