use super::{RecordError, RecordStore};
use crate::models::{InteractionRule, PatientRecord};

/// Record store over owned vectors. Used by tests and by embedders that
/// already hold their data in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    patients: Vec<PatientRecord>,
    interactions: Vec<InteractionRule>,
}

impl InMemoryRecordStore {
    pub fn new(patients: Vec<PatientRecord>, interactions: Vec<InteractionRule>) -> Self {
        Self {
            patients,
            interactions,
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn list_patients(&self) -> Result<Vec<PatientRecord>, RecordError> {
        Ok(self.patients.clone())
    }

    fn load_interaction_table(&self) -> Result<Vec<InteractionRule>, RecordError> {
        Ok(self.interactions.clone())
    }
}
