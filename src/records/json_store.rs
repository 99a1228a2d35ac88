use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::{RecordError, RecordStore};
use crate::models::{InteractionRule, PatientRecord};

pub const PATIENTS_FILE: &str = "patients.json";
pub const INTERACTIONS_FILE: &str = "drug_interactions.json";

/// Record store backed by two JSON files in a data directory.
///
/// Files are re-read on every call, so edits to the data directory are
/// picked up by the next analysis without a restart. Nothing is cached.
pub struct JsonRecordStore {
    data_dir: PathBuf,
}

impl JsonRecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn patients_path(&self) -> PathBuf {
        self.data_dir.join(PATIENTS_FILE)
    }

    fn interactions_path(&self) -> PathBuf {
        self.data_dir.join(INTERACTIONS_FILE)
    }
}

impl RecordStore for JsonRecordStore {
    fn list_patients(&self) -> Result<Vec<PatientRecord>, RecordError> {
        read_json_list(&self.patients_path())
    }

    fn load_interaction_table(&self) -> Result<Vec<InteractionRule>, RecordError> {
        read_json_list(&self.interactions_path())
    }
}

/// Read a JSON array from disk. A missing file is an empty list, not an error.
fn read_json_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, RecordError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Data file missing, treating as empty");
            return Ok(vec![]);
        }
        Err(source) => {
            return Err(RecordError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&content).map_err(|source| RecordError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
