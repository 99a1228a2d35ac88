use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::prompt::{PROBE_MAX_TOKENS, PROBE_PROMPT};
use super::AnalysisError;
use crate::config::AnalyzerConfig;

/// Sampling temperature for the liveness probe.
const PROBE_TEMPERATURE: f32 = 0.0;

/// Language-model completion abstraction (allows mocking).
///
/// Implementations make a single attempt per call. Retrying is left to the
/// caller, which is the only one who knows whether the context is still fresh.
pub trait InferenceClient {
    fn complete(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, AnalysisError>;

    /// Send a minimal fixed prompt and return the raw completion.
    fn probe(&self) -> Result<String, AnalysisError> {
        self.complete(PROBE_PROMPT, PROBE_MAX_TOKENS, PROBE_TEMPERATURE)
    }
}

/// HTTP client for an OpenAI-compatible chat completions endpoint (Groq by default).
pub struct GroqClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GroqClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, AnalysisError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                AnalysisError::InferenceUnavailable(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, AnalysisError> {
        Self::new(
            &config.llm_base_url,
            config.api_key.clone(),
            &config.llm_model,
            config.llm_timeout_secs,
        )
    }
}

/// Request body for /chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from /chat/completions
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn first_choice_content(response: ChatCompletionResponse) -> Result<String, AnalysisError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| {
            AnalysisError::InferenceUnavailable("Completion response contained no choices".into())
        })
}

impl InferenceClient for GroqClient {
    fn complete(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, AnalysisError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: max_output_tokens,
            temperature,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                AnalysisError::InferenceUnavailable(format!(
                    "Cannot connect to {}: {e}",
                    self.base_url
                ))
            } else if e.is_timeout() {
                AnalysisError::InferenceUnavailable(format!(
                    "Request timed out after {}s: {e}",
                    self.timeout_secs
                ))
            } else {
                AnalysisError::InferenceUnavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AnalysisError::InferenceUnavailable(format!(
                "Service returned status {}: {body}",
                status.as_u16()
            )));
        }

        let parsed: ChatCompletionResponse = response.json().map_err(|e| {
            AnalysisError::InferenceUnavailable(format!("Unreadable completion response: {e}"))
        })?;

        first_choice_content(parsed)
    }
}

/// Mock inference client for testing: returns a configurable response
/// and counts calls.
pub struct MockInferenceClient {
    response: Result<String, String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockInferenceClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// A client whose every call fails with `InferenceUnavailable(message)`.
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

impl InferenceClient for MockInferenceClient {
    fn complete(
        &self,
        prompt: &str,
        _max_output_tokens: u32,
        _temperature: f32,
    ) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }
        self.response
            .clone()
            .map_err(AnalysisError::InferenceUnavailable)
    }
}
