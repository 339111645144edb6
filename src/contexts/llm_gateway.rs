//! Single request/response exchange with the configured LLM provider.

use crate::contexts::prompt_builder::SYSTEM_MESSAGE;
use crate::registries::{ProviderKind, ProviderSettings};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling temperature for every completion.
pub const TEMPERATURE: f32 = 0.7;
/// Response length ceiling for every completion.
pub const MAX_TOKENS: u32 = 2000;

/// Errors that can occur while talking to the provider
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("LLM API key not configured. Set {variable} in .env.local")]
    Configuration { variable: &'static str },
    #[error("{provider} responded with status {status}")]
    Upstream { provider: ProviderKind, status: u16 },
    #[error("request to LLM provider failed: {0}")]
    Transport(String),
    #[error("unexpected completion envelope: {0}")]
    Envelope(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// Body of a non-streaming chat-completion request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Reachability of the provider as seen by the health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmStatus {
    Healthy,
    Error,
    NotConfigured,
}

impl LlmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmStatus::Healthy => "healthy",
            LlmStatus::Error => "error",
            LlmStatus::NotConfigured => "not_configured",
        }
    }
}

impl fmt::Display for LlmStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct LlmGateway {
    client: reqwest::Client,
    provider: ProviderSettings,
}

impl LlmGateway {
    pub fn new(provider: ProviderSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            provider,
        }
    }

    pub fn provider(&self) -> &ProviderSettings {
        &self.provider
    }

    fn credential(&self) -> Result<&str, GatewayError> {
        self.provider
            .api_key
            .as_deref()
            .ok_or(GatewayError::Configuration {
                variable: self.provider.credential_var(),
            })
    }

    /// Sends `prompt` and returns the first completion's text unmodified.
    ///
    /// The credential is checked before anything goes on the wire. There are
    /// no retries; a failure is final for this prompt.
    pub async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let api_key = self.credential()?;

        let request = ChatRequest {
            model: &self.provider.model,
            messages: vec![
                ChatMessage::new("system", SYSTEM_MESSAGE),
                ChatMessage::new("user", prompt),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        tracing::debug!(
            provider = %self.provider.kind,
            model = %self.provider.model,
            "requesting completion"
        );

        let response = self
            .client
            .post(&self.provider.completions_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                provider = %self.provider.kind,
                status = status.as_u16(),
                body = %body,
                "LLM API error"
            );
            return Err(GatewayError::Upstream {
                provider: self.provider.kind,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let envelope: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(body = %body, "completion envelope did not parse");
            GatewayError::Envelope(e.to_string())
        })?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::Envelope("no completion content".to_string()))
    }

    /// Lightweight reachability check against the model-listing endpoint.
    pub async fn probe(&self) -> LlmStatus {
        let Ok(api_key) = self.credential() else {
            return LlmStatus::NotConfigured;
        };

        match self
            .client
            .get(&self.provider.models_url)
            .bearer_auth(api_key)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => LlmStatus::Healthy,
            Ok(response) => {
                tracing::warn!(status = response.status().as_u16(), "LLM health check rejected");
                LlmStatus::Error
            }
            Err(e) => {
                tracing::error!(error = %e, "LLM health check failed");
                LlmStatus::Error
            }
        }
    }
}
