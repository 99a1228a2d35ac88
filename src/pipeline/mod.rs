pub mod interaction; // Medication-safety analysis: match → context → LLM → parse
