use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One knowledge-base entry naming two drug terms that interact.
///
/// Only `drug_a` and `drug_b` are interpreted (by the matcher). Everything
/// else in the source object, such as severity or mechanism, is kept in
/// `metadata` and passed through to the prompt untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRule {
    pub drug_a: String,
    pub drug_b: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl InteractionRule {
    pub fn new(drug_a: &str, drug_b: &str) -> Self {
        Self {
            drug_a: drug_a.to_string(),
            drug_b: drug_b.to_string(),
            metadata: Map::new(),
        }
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_survives_a_decode_encode_pass() {
        let json = r#"{
            "drug_a": "warfarin",
            "drug_b": "ibuprofen",
            "severity": "Major",
            "description": "Increased bleeding risk"
        }"#;
        let rule: InteractionRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.drug_a, "warfarin");
        assert_eq!(rule.metadata["severity"], "Major");

        let encoded = serde_json::to_value(&rule).unwrap();
        assert_eq!(encoded["description"], "Increased bleeding risk");
        assert_eq!(encoded["drug_b"], "ibuprofen");
    }

    #[test]
    fn builder_adds_metadata() {
        let rule = InteractionRule::new("a", "b").with_meta("severity", "Minor");
        assert_eq!(rule.metadata.len(), 1);
    }
}
