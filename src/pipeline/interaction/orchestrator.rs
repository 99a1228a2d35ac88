use serde::Serialize;
use uuid::Uuid;

use super::client::InferenceClient;
use super::context::build_clinical_context;
use super::matcher::match_interactions;
use super::parser::parse_analysis_response;
use super::prompt::{build_interaction_prompt, ANALYSIS_MAX_TOKENS, ANALYSIS_TEMPERATURE};
use super::AnalysisError;
use crate::models::{AnalysisRequest, AnalysisResult, FallbackReason, InteractionRule};
use crate::records::RecordStore;

/// Result of a connectivity probe against the inference service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub reachable: bool,
    /// Raw completion text, or `Error: <detail>` when unreachable.
    pub response: String,
}

/// Orchestrates a medication-safety analysis:
/// lookup → match → context → prompt → LLM → parse → result
///
/// Holds no per-request state. Patient and interaction data are re-read
/// from the record store on every call, so one analyzer can serve
/// concurrent requests.
pub struct InteractionAnalyzer {
    records: Box<dyn RecordStore + Send + Sync>,
    client: Box<dyn InferenceClient + Send + Sync>,
}

impl InteractionAnalyzer {
    pub fn new(
        records: Box<dyn RecordStore + Send + Sync>,
        client: Box<dyn InferenceClient + Send + Sync>,
    ) -> Self {
        Self { records, client }
    }

    /// Analyze new medications for one patient.
    ///
    /// Returns `Err(PatientNotFound)` before any inference call when the
    /// patient is unknown. Inference and parse failures never surface as
    /// errors: they become a fallback result that is not safe to prescribe.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let analysis_id = Uuid::new_v4();
        let _span = tracing::info_span!(
            "analyze_interactions",
            %analysis_id,
            patient_id = %request.patient_id
        )
        .entered();

        // Step 1: Patient lookup
        let patient = self
            .records
            .find_patient(&request.patient_id)?
            .ok_or_else(|| AnalysisError::PatientNotFound(request.patient_id.clone()))?;

        // Step 2: Knowledge base (an unreadable table is an empty table)
        let table = self.load_interaction_table();

        // Step 3: Narrow to candidate rules
        let matched = match_interactions(
            &patient.current_medications,
            &request.new_medications,
            &table,
        );
        tracing::debug!(
            table_size = table.len(),
            matched = matched.len(),
            new_medications = request.new_medications.len(),
            "Matched interaction candidates"
        );

        // Step 4+5: Context document and prompt
        let context =
            build_clinical_context(&patient, &request.new_medications, &matched, &request.notes);
        let prompt = build_interaction_prompt(&context);

        // Step 6: Inference
        let completion =
            match self
                .client
                .complete(&prompt, ANALYSIS_MAX_TOKENS, ANALYSIS_TEMPERATURE)
            {
                Ok(text) => text,
                Err(e) => {
                    let detail = match e {
                        AnalysisError::InferenceUnavailable(detail) => detail,
                        other => other.to_string(),
                    };
                    tracing::warn!(error = %detail, "Inference call failed, returning fallback");
                    return Ok(AnalysisResult::fallback(
                        &request.patient_id,
                        FallbackReason::InferenceUnavailable,
                        format!("API Error: {detail}"),
                    ));
                }
            };
        tracing::debug!(
            prompt_chars = prompt.len(),
            completion_chars = completion.len(),
            "Received completion"
        );

        // Step 7: Parse
        match parse_analysis_response(&completion) {
            Ok(payload) => {
                tracing::info!(
                    warnings = payload.warnings.len(),
                    safe_to_prescribe = payload.safe_to_prescribe,
                    "Interaction analysis complete"
                );
                Ok(AnalysisResult {
                    patient_id: request.patient_id.clone(),
                    warnings: payload.warnings,
                    safe_to_prescribe: payload.safe_to_prescribe,
                    llm_reasoning: payload.reasoning,
                    fallback: None,
                })
            }
            Err(failure) => {
                tracing::warn!(error = %failure.detail, "Model output unparseable, returning fallback");
                Ok(AnalysisResult::fallback(
                    &request.patient_id,
                    FallbackReason::MalformedModelOutput,
                    failure.fallback.reasoning,
                ))
            }
        }
    }

    /// Send the liveness prompt and report the raw answer or the failure.
    pub fn probe_connection(&self) -> ProbeOutcome {
        match self.client.probe() {
            Ok(response) => ProbeOutcome {
                reachable: true,
                response,
            },
            Err(e) => {
                tracing::debug!(error = %e, "Inference probe failed");
                ProbeOutcome {
                    reachable: false,
                    response: format!("Error: {e}"),
                }
            }
        }
    }

    fn load_interaction_table(&self) -> Vec<InteractionRule> {
        self.records.load_interaction_table().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Interaction table unavailable, continuing without it");
            vec![]
        })
    }
}
