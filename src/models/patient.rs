use serde::{Deserialize, Serialize};

/// Read-only snapshot of a patient as held by the record store.
///
/// Older data files carry diagnoses under `diagnoses_text`; both spellings
/// are accepted. List fields that are missing decode as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    #[serde(default, alias = "diagnoses_text")]
    pub diagnoses: Vec<String>,
    #[serde(default)]
    pub current_medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}
