//! Text-generation backend abstraction.
//!
//! Enum-based dispatch over backends, avoiding the dyn-compatibility
//! issues with async trait methods. One concrete HTTP implementation
//! exists for OpenAI-compatible chat completions APIs; `Offline` is a
//! first-class backend that always reports unavailability so callers
//! fall through to their documented fallback values.

use std::time::Duration;

use crate::error::ChefError;

/// Which backend to run the chef against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// No network calls; every generation resolves to its fallback.
    #[default]
    Offline,
    /// OpenAI-compatible chat completions API.
    OpenAi,
}

impl BackendKind {
    /// Parse a backend name from configuration. Unknown names fall back
    /// to offline so a typo can never strand the game waiting on a
    /// nonexistent service.
    pub fn from_name(name: &str) -> Self {
        match name {
            "openai" => Self::OpenAi,
            _ => Self::Offline,
        }
    }
}

/// Connection settings for the generation backend.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Which backend to use.
    pub kind: BackendKind,
    /// Base URL of the chat-completions API.
    pub api_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// API key for the `Authorization` header.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// A text-generation backend that can answer a prompt.
pub enum ChefBackend {
    /// Always unavailable; callers use their fallbacks.
    Offline,
    /// OpenAI-compatible chat completions API.
    OpenAi(OpenAiBackend),
}

impl ChefBackend {
    /// Build a backend from settings.
    pub fn from_settings(settings: &BackendSettings) -> Self {
        match settings.kind {
            BackendKind::Offline => Self::Offline,
            BackendKind::OpenAi => Self::OpenAi(OpenAiBackend::new(settings)),
        }
    }

    /// Send a prompt and return the raw response text.
    ///
    /// # Errors
    ///
    /// Returns [`ChefError::Backend`] when the backend is offline, the
    /// HTTP call fails, or the response body cannot be extracted.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, ChefError> {
        match self {
            Self::Offline => Err(ChefError::Backend("offline backend".to_owned())),
            Self::OpenAi(backend) => backend.complete(system, user).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Offline => "offline",
            Self::OpenAi(_) => "openai-compatible",
        }
    }
}

/// Backend for OpenAI-compatible chat completions APIs.
///
/// Sends requests to `{api_url}/chat/completions`. The request timeout
/// lives on the client; the caller has no retry policy, so one call is
/// one resolution.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Create a new OpenAI-compatible backend.
    pub fn new(settings: &BackendSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        }
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, ChefError> {
        let url = format!("{}/chat/completions", self.api_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "temperature": 0.9,
            "max_tokens": 512,
            "response_format": {"type": "json_object"}
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ChefError::Backend(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ChefError::Backend(format!(
                "backend returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChefError::Backend(format!("response parse failed: {e}")))?;

        extract_openai_content(&json)
    }
}

/// Extract the text content from an OpenAI chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, ChefError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            ChefError::Backend("response missing choices[0].message.content".to_owned())
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn extract_openai_content_valid() {
        let json = serde_json::json!({
            "choices": [{
                "message": {
                    "content": "{\"name\": \"Starlight Ramen\", \"icon\": \"🍜\"}"
                }
            }]
        });
        let result = extract_openai_content(&json);
        assert!(result.unwrap().contains("Starlight Ramen"));
    }

    #[test]
    fn extract_openai_content_missing_choices() {
        let json = serde_json::json!({"error": "rate_limit"});
        assert!(extract_openai_content(&json).is_err());
    }

    #[test]
    fn unknown_backend_name_falls_back_to_offline() {
        assert_eq!(BackendKind::from_name("openai"), BackendKind::OpenAi);
        assert_eq!(BackendKind::from_name("gemini"), BackendKind::Offline);
        assert_eq!(BackendKind::from_name(""), BackendKind::Offline);
    }

    #[tokio::test]
    async fn offline_backend_reports_unavailable() {
        let backend = ChefBackend::Offline;
        assert_eq!(backend.name(), "offline");
        assert!(backend.complete("system", "user").await.is_err());
    }
}
