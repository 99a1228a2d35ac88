//! Runtime configuration.
//!
//! Resolved once at startup and passed into services, so request handling
//! never reads process-wide environment variables.

use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_DATA_DIR: &str = "data";

const ENV_API_KEY: &str = "GROQ_API_KEY";
const ENV_BASE_URL: &str = "SADEWA_LLM_BASE_URL";
const ENV_MODEL: &str = "SADEWA_LLM_MODEL";
const ENV_TIMEOUT: &str = "SADEWA_LLM_TIMEOUT_SECS";
const ENV_DATA_DIR: &str = "SADEWA_DATA_DIR";

/// Log filter used when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "sadewa=info,sadewa_lib=info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Settings for the analyzer and its collaborators.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Bearer token for the inference service. Requests without one are
    /// sent anyway and fail at the service.
    pub api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    /// Request timeout imposed on every inference call.
    pub llm_timeout_secs: u64,
    /// Directory holding `patients.json` and `drug_interactions.json`.
    pub data_dir: PathBuf,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl AnalyzerConfig {
    /// Resolve from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let llm_timeout_secs = match get(ENV_TIMEOUT) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_TIMEOUT.into(),
                    value: raw.clone(),
                })?,
            None => defaults.llm_timeout_secs,
        };

        Ok(Self {
            api_key: get(ENV_API_KEY),
            llm_base_url: get(ENV_BASE_URL).unwrap_or(defaults.llm_base_url),
            llm_model: get(ENV_MODEL).unwrap_or(defaults.llm_model),
            llm_timeout_secs,
            data_dir: get(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        })
    }
}
