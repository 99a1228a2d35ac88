pub mod client;
pub mod context;
pub mod matcher;
pub mod orchestrator;
pub mod parser;
pub mod prompt;

pub use client::*;
pub use context::*;
pub use matcher::*;
pub use orchestrator::*;
pub use parser::*;
pub use prompt::*;

use thiserror::Error;

use crate::records::RecordError;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Patient {0} not found")]
    PatientNotFound(String),

    #[error("Inference service unavailable: {0}")]
    InferenceUnavailable(String),

    #[error("Record store error: {0}")]
    Records(#[from] RecordError),
}
