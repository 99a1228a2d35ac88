//! Read-only patient and interaction data.
//!
//! The analysis pipeline only needs two lookups (patient by id and the full
//! interaction table), both behind `RecordStore` so tests can swap in an
//! in-memory store.

pub mod json_store;
pub mod memory;

pub use json_store::*;
pub use memory::*;

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{InteractionRule, PatientRecord};

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Record store abstraction (allows mocking)
pub trait RecordStore {
    fn list_patients(&self) -> Result<Vec<PatientRecord>, RecordError>;

    fn load_interaction_table(&self) -> Result<Vec<InteractionRule>, RecordError>;

    fn find_patient(&self, id: &str) -> Result<Option<PatientRecord>, RecordError> {
        Ok(self.list_patients()?.into_iter().find(|p| p.id == id))
    }

    /// Case-insensitive substring search on patient name, in store order.
    fn search_patients(&self, name: &str) -> Result<Vec<PatientRecord>, RecordError> {
        let needle = name.to_lowercase();
        Ok(self
            .list_patients()?
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect())
    }
}
