use serde::{Deserialize, Serialize};

use super::enums::{FallbackReason, Severity, WarningKind};

/// A prescriber's request to check new medications for one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub patient_id: String,
    pub new_medications: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// A single interaction or contraindication flagged by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionWarning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub severity: Severity,
    pub description: String,
    pub medications_involved: Vec<String>,
}

/// Final outcome of an interaction analysis.
///
/// `fallback` is set only when the verdict was not produced by the model:
/// the service could not be reached, or its output could not be decoded.
/// In both cases `safe_to_prescribe` is false and `warnings` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub patient_id: String,
    pub warnings: Vec<InteractionWarning>,
    pub safe_to_prescribe: bool,
    pub llm_reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
}

impl AnalysisResult {
    /// Fail-safe result: no warnings and never safe to prescribe.
    pub fn fallback(patient_id: &str, reason: FallbackReason, reasoning: String) -> Self {
        Self {
            patient_id: patient_id.to_string(),
            warnings: vec![],
            safe_to_prescribe: false,
            llm_reasoning: reasoning,
            fallback: Some(reason),
        }
    }
}
