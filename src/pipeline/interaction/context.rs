use crate::models::{InteractionRule, PatientRecord};

/// Placeholder rendered when the patient has no recorded allergies.
const NO_ALLERGIES: &str = "None";

/// Render the clinical context document handed to the model.
///
/// Sections appear in a fixed order: demographics, diagnoses, current
/// medications, allergies, new medications, notes, then the matched
/// interaction rules as pretty-printed JSON. Empty lists render as empty
/// segments; nothing here is validated.
pub fn build_clinical_context(
    patient: &PatientRecord,
    new_medications: &[String],
    matched_rules: &[InteractionRule],
    notes: &str,
) -> String {
    let allergies = if patient.allergies.is_empty() {
        NO_ALLERGIES.to_string()
    } else {
        patient.allergies.join(", ")
    };

    format!(
        r#"
Patient: {name} ({age} years old, {gender})

Current Diagnoses: {diagnoses}
Current Medications: {current}
Allergies: {allergies}

NEW MEDICATIONS TO PRESCRIBE: {new}

CLINICAL NOTES: {notes}

KNOWN DRUG INTERACTIONS DATABASE:
{rules}
"#,
        name = patient.name,
        age = patient.age,
        gender = patient.gender,
        diagnoses = patient.diagnoses.join(", "),
        current = patient.current_medications.join(", "),
        new = new_medications.join(", "),
        rules = format_rules(matched_rules),
    )
}

fn format_rules(rules: &[InteractionRule]) -> String {
    serde_json::to_string_pretty(rules).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not serialize matched interaction rules");
        "[]".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientRecord {
        PatientRecord {
            id: "P001".into(),
            name: "Budi Santoso".into(),
            age: 65,
            gender: "Male".into(),
            diagnoses: vec!["Atrial fibrillation".into(), "Hypertension".into()],
            current_medications: vec!["Warfarin".into()],
            allergies: vec![],
        }
    }

    #[test]
    fn contains_medications_and_rule() {
        let rule = InteractionRule::new("warfarin", "ibuprofen")
            .with_meta("description", "Increased bleeding risk");
        let context = build_clinical_context(
            &patient(),
            &["Ibuprofen 400mg".to_string()],
            &[rule],
            "Knee pain",
        );

        assert!(context.contains("Current Medications: Warfarin"));
        assert!(context.contains("NEW MEDICATIONS TO PRESCRIBE: Ibuprofen 400mg"));
        assert!(context.contains("\"drug_a\": \"warfarin\""));
        assert!(context.contains("\"drug_b\": \"ibuprofen\""));
        assert!(context.contains("Increased bleeding risk"));
    }

    #[test]
    fn header_and_sections_in_order() {
        let context = build_clinical_context(&patient(), &["Ibuprofen".to_string()], &[], "Knee pain");

        assert!(context.contains("Patient: Budi Santoso (65 years old, Male)"));
        assert!(context.contains("Current Diagnoses: Atrial fibrillation, Hypertension"));
        assert!(context.contains("CLINICAL NOTES: Knee pain"));

        let order = [
            "Patient:",
            "Current Diagnoses:",
            "Current Medications:",
            "Allergies:",
            "NEW MEDICATIONS TO PRESCRIBE:",
            "CLINICAL NOTES:",
            "KNOWN DRUG INTERACTIONS DATABASE:",
        ];
        let positions: Vec<usize> = order.iter().map(|s| context.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_allergies_render_placeholder() {
        let context = build_clinical_context(&patient(), &[], &[], "");
        assert!(context.contains("Allergies: None"));
    }

    #[test]
    fn allergies_are_comma_joined() {
        let mut p = patient();
        p.allergies = vec!["Penicillin".into(), "Sulfa".into()];
        let context = build_clinical_context(&p, &[], &[], "");
        assert!(context.contains("Allergies: Penicillin, Sulfa"));
    }

    #[test]
    fn no_rules_render_empty_array() {
        let context = build_clinical_context(&patient(), &[], &[], "");
        assert!(context.contains("KNOWN DRUG INTERACTIONS DATABASE:\n[]"));
    }

    #[test]
    fn is_deterministic() {
        let rules = vec![InteractionRule::new("warfarin", "ibuprofen")];
        let a = build_clinical_context(&patient(), &["Ibuprofen".into()], &rules, "n");
        let b = build_clinical_context(&patient(), &["Ibuprofen".into()], &rules, "n");
        assert_eq!(a, b);
    }
}
