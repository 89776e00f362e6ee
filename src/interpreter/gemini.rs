//! Gemini-backed [`LanguageService`] implementation.

use serde_json::Value;

use super::LanguageService;
use crate::error::InterpreterError;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com\
                                /v1beta/models/gemini-2.0-flash:generateContent";

/// Blocking client for the Gemini `generateContent` API.
pub struct GeminiClient {
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    /// Client against the default endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        }
    }

    /// Client against a custom endpoint (local proxies, tests).
    #[must_use]
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self { api_key: api_key.into(), endpoint: endpoint.into() }
    }
}

impl LanguageService for GeminiClient {
    fn complete(&self, prompt: &str) -> Result<String, InterpreterError> {
        let url = format!("{}?key={}", self.endpoint, self.api_key);
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let raw = ureq::post(&url)
            .header("content-type", "application/json")
            .send(body.to_string())
            .map_err(|e| InterpreterError::Service(e.to_string()))?
            .into_body()
            .read_to_string()
            .map_err(|e| InterpreterError::Service(e.to_string()))?;

        let envelope: Value = serde_json::from_str(&raw)
            .map_err(|e| InterpreterError::Envelope(e.to_string()))?;
        envelope
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                InterpreterError::Envelope(
                    "no candidate text in response".to_owned(),
                )
            })
    }
}
