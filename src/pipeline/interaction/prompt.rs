/// Output budget for an interaction analysis completion.
pub const ANALYSIS_MAX_TOKENS: u32 = 1000;

/// Low temperature for consistent clinical output.
pub const ANALYSIS_TEMPERATURE: f32 = 0.1;

/// Fixed liveness prompt for the connectivity probe.
pub const PROBE_PROMPT: &str = "Hello, respond with just 'OK' if you can hear me.";

pub const PROBE_MAX_TOKENS: u32 = 10;

/// Build the interaction analysis prompt around a clinical context document.
///
/// The response schema in this template is the contract the parser relies
/// on; keep both in step.
pub fn build_interaction_prompt(context: &str) -> String {
    format!(
        r#"You are a clinical pharmacist AI assistant. Analyze the following medication scenario and provide warnings.

PATIENT CONTEXT:
{context}

TASK: Analyze potential drug interactions and contraindications. Return response in JSON format ONLY.

RESPONSE FORMAT:
{{
    "warnings": [
        {{
            "type": "drug-drug" or "drug-disease",
            "severity": "Major" or "Moderate" or "Minor",
            "description": "Clinical explanation",
            "medications_involved": ["drug1", "drug2"]
        }}
    ],
    "safe_to_prescribe": true/false,
    "reasoning": "Brief clinical reasoning"
}}

IMPORTANT:
- Only return valid JSON
- Use clinical terminology
- Focus on actionable warnings
- Consider patient's age, gender, and existing conditions"#
    )
}
