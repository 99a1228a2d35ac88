use serde::Deserialize;
use serde_json::Value;

use crate::models::InteractionWarning;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Decoded model verdict, before it is stamped with a patient id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisPayload {
    pub warnings: Vec<InteractionWarning>,
    pub safe_to_prescribe: bool,
    pub reasoning: String,
}

/// Model output could not be decoded. Carries the fail-safe payload to use
/// in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub detail: String,
    pub fallback: AnalysisPayload,
}

impl ParseFailure {
    fn new(detail: String) -> Self {
        let fallback = AnalysisPayload {
            warnings: vec![],
            safe_to_prescribe: false,
            reasoning: format!("Error parsing AI response: {detail}"),
        };
        Self { detail, fallback }
    }
}

/// Fenced-block extractions, tried in order before falling back to the
/// whole completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extraction {
    /// Between a ```json fence and the next fence (or end of text).
    JsonFence,
    /// Between the first plain fence and the next fence (or end of text).
    AnyFence,
}

const EXTRACTION_ORDER: [Extraction; 2] = [Extraction::JsonFence, Extraction::AnyFence];

impl Extraction {
    fn apply(self, text: &str) -> Option<&str> {
        match self {
            Self::JsonFence => after_fence(text, JSON_FENCE),
            Self::AnyFence => after_fence(text, FENCE),
        }
    }
}

fn after_fence<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.find(FENCE).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Pick the candidate JSON text out of a completion. The first fence
/// strategy that applies wins; without any fence the whole text is used.
fn extract_json_text(response: &str) -> &str {
    EXTRACTION_ORDER
        .iter()
        .find_map(|strategy| strategy.apply(response))
        .unwrap_or(response)
        .trim()
}

/// Parse the model's completion into a typed verdict.
///
/// Missing fields take their fail-safe defaults (`warnings` empty,
/// `safe_to_prescribe` false, `reasoning` empty). Anything else that is
/// off is a `ParseFailure`: a non-object top level, a wrongly-typed field,
/// or any warning entry that does not match the warning shape. A verdict
/// is never returned alongside a warning that could not be read.
pub fn parse_analysis_response(response: &str) -> Result<AnalysisPayload, ParseFailure> {
    #[derive(Deserialize)]
    struct RawAnalysis {
        #[serde(default)]
        warnings: Option<Vec<Value>>,
        #[serde(default)]
        safe_to_prescribe: Option<bool>,
        #[serde(default)]
        reasoning: Option<String>,
    }

    let json_text = extract_json_text(response);

    let value: Value =
        serde_json::from_str(json_text).map_err(|e| ParseFailure::new(e.to_string()))?;
    if !value.is_object() {
        return Err(ParseFailure::new(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    }

    let raw: RawAnalysis =
        serde_json::from_value(value).map_err(|e| ParseFailure::new(e.to_string()))?;

    let warnings = parse_warnings(raw.warnings.unwrap_or_default())?;

    Ok(AnalysisPayload {
        warnings,
        safe_to_prescribe: raw.safe_to_prescribe.unwrap_or(false),
        reasoning: raw.reasoning.unwrap_or_default(),
    })
}

/// Decode every warning entry; the first one that does not fit fails the whole parse.
fn parse_warnings(items: Vec<Value>) -> Result<Vec<InteractionWarning>, ParseFailure> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, v)| {
            serde_json::from_value(v).map_err(|e| {
                tracing::debug!(index, error = %e, "Unreadable warning entry in model output");
                ParseFailure::new(format!("warning {index}: {e}"))
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Severity, WarningKind};

    const CANONICAL: &str = r#"{"warnings": [{"type":"drug-drug","severity":"Major","description":"x","medications_involved":["Warfarin","Ibuprofen"]}], "safe_to_prescribe": false, "reasoning": "risk of bleeding"}"#;

    #[test]
    fn parses_json_fenced_response() {
        let response = format!("Here is my analysis:\n```json\n{CANONICAL}\n```\nLet me know.");
        let payload = parse_analysis_response(&response).unwrap();

        assert_eq!(payload.warnings.len(), 1);
        let warning = &payload.warnings[0];
        assert_eq!(warning.kind, WarningKind::DrugDrug);
        assert_eq!(warning.severity, Severity::Major);
        assert_eq!(warning.description, "x");
        assert_eq!(warning.medications_involved, vec!["Warfarin", "Ibuprofen"]);
        assert!(!payload.safe_to_prescribe);
        assert_eq!(payload.reasoning, "risk of bleeding");
    }

    #[test]
    fn parses_plain_fenced_response() {
        let response = format!("```\n{CANONICAL}\n```");
        let payload = parse_analysis_response(&response).unwrap();
        assert_eq!(payload.warnings.len(), 1);
    }

    #[test]
    fn parses_unfenced_response() {
        let payload = parse_analysis_response(&format!("  {CANONICAL}\n")).unwrap();
        assert_eq!(payload.reasoning, "risk of bleeding");
    }

    #[test]
    fn unclosed_json_fence_takes_rest_of_text() {
        let response = format!("```json\n{CANONICAL}");
        assert!(parse_analysis_response(&response).is_ok());
    }

    #[test]
    fn json_fence_wins_over_earlier_plain_fence() {
        let response = format!("```\nnot this\n```\n```json\n{CANONICAL}\n```");
        let payload = parse_analysis_response(&response).unwrap();
        assert_eq!(payload.warnings.len(), 1);
    }

    #[test]
    fn not_json_yields_fallback() {
        let failure = parse_analysis_response("not json at all").unwrap_err();
        assert!(failure.fallback.warnings.is_empty());
        assert!(!failure.fallback.safe_to_prescribe);
        assert!(failure.fallback.reasoning.starts_with("Error parsing AI response:"));
        assert!(failure.fallback.reasoning.contains(&failure.detail));
    }

    #[test]
    fn empty_response_yields_fallback() {
        assert!(parse_analysis_response("").is_err());
        assert!(parse_analysis_response("```json\n```").is_err());
    }

    #[test]
    fn missing_fields_take_safe_defaults() {
        let payload = parse_analysis_response("{}").unwrap();
        assert!(payload.warnings.is_empty());
        assert!(!payload.safe_to_prescribe);
        assert_eq!(payload.reasoning, "");
    }

    #[test]
    fn null_fields_take_safe_defaults() {
        let payload =
            parse_analysis_response(r#"{"warnings": null, "safe_to_prescribe": null, "reasoning": null}"#)
                .unwrap();
        assert!(payload.warnings.is_empty());
        assert!(!payload.safe_to_prescribe);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let payload = parse_analysis_response(
            r#"{"safe_to_prescribe": true, "reasoning": "ok", "confidence": 0.9}"#,
        )
        .unwrap();
        assert!(payload.safe_to_prescribe);
        assert_eq!(payload.reasoning, "ok");
    }

    #[test]
    fn top_level_array_is_rejected() {
        let failure = parse_analysis_response("[1, 2, 3]").unwrap_err();
        assert!(failure.detail.contains("an array"));
    }

    #[test]
    fn wrongly_typed_field_is_rejected() {
        assert!(parse_analysis_response(r#"{"safe_to_prescribe": "yes"}"#).is_err());
        assert!(parse_analysis_response(r#"{"warnings": "none"}"#).is_err());
    }

    #[test]
    fn warning_with_unknown_severity_fails_the_parse() {
        let response = r#"{
            "warnings": [
                {"type": "drug-drug", "severity": "Major", "description": "Bleeding risk", "medications_involved": ["Warfarin", "Ibuprofen"]},
                {"type": "drug-drug", "severity": "Severe", "description": "Bleeding risk", "medications_involved": ["Warfarin", "Aspirin"]}
            ],
            "safe_to_prescribe": true,
            "reasoning": "acceptable"
        }"#;
        let failure = parse_analysis_response(response).unwrap_err();
        assert!(failure.detail.starts_with("warning 1:"));
        assert!(failure.detail.contains("Severe"));
        assert!(failure.fallback.warnings.is_empty());
        assert!(!failure.fallback.safe_to_prescribe);
    }

    #[test]
    fn warning_with_unknown_type_or_missing_fields_fails_the_parse() {
        let unknown_type = r#"{"warnings": [{"type": "drug-food", "severity": "Major", "description": "x", "medications_involved": ["Warfarin"]}], "safe_to_prescribe": true}"#;
        assert!(parse_analysis_response(unknown_type).is_err());

        let missing = r#"{"warnings": [{"description": "missing fields"}], "safe_to_prescribe": true}"#;
        assert!(parse_analysis_response(missing).is_err());
    }

    #[test]
    fn warning_values_are_case_insensitive() {
        let response = r#"{"warnings": [{"type": "Drug-Disease", "severity": "moderate", "description": "NSAID in CKD", "medications_involved": ["Ibuprofen"]}], "safe_to_prescribe": false}"#;
        let payload = parse_analysis_response(response).unwrap();
        assert_eq!(payload.warnings[0].kind, WarningKind::DrugDisease);
        assert_eq!(payload.warnings[0].severity, Severity::Moderate);
    }

    #[test]
    fn fence_strategies_run_before_whole_text() {
        assert_eq!(EXTRACTION_ORDER, [Extraction::JsonFence, Extraction::AnyFence]);
        assert_eq!(extract_json_text("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(extract_json_text("```json\n{}\n```"), "{}");
        assert_eq!(extract_json_text("```\n{}\n```"), "{}");
    }
}
