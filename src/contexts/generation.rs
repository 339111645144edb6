//! Request → prompt → provider → sanitized result.

use crate::contexts::llm_gateway::{GatewayError, LlmGateway};
use crate::contexts::prompt_builder::build_prompt;
use crate::contexts::sanitizer::{MalformedResponseError, sanitize};
use crate::data::{GenerationRequest, GenerationResult, ValidationError};

/// Every way a generation can fail. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponseError),
}

impl GenerateError {
    /// HTTP status reported to the caller.
    pub fn status(&self) -> u16 {
        match self {
            GenerateError::Validation(_) => 400,
            GenerateError::Gateway(GatewayError::Upstream { status, .. }) => *status,
            GenerateError::Gateway(_) | GenerateError::MalformedResponse(_) => 500,
        }
    }

    /// Message safe to show to end users. Upstream bodies and raw model
    /// output stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            GenerateError::Validation(e) => e.to_string(),
            GenerateError::Gateway(e @ GatewayError::Configuration { .. }) => e.to_string(),
            GenerateError::Gateway(GatewayError::Upstream { .. }) => {
                "Failed to generate tasks from LLM".to_string()
            }
            GenerateError::Gateway(GatewayError::Envelope(_))
            | GenerateError::MalformedResponse(_) => {
                "Invalid response format from LLM".to_string()
            }
            GenerateError::Gateway(GatewayError::Transport(_)) => {
                "Internal server error".to_string()
            }
        }
    }
}

/// Runs one generation. Validation happens before any network traffic.
pub async fn generate(
    gateway: &LlmGateway,
    request: &GenerationRequest,
) -> Result<GenerationResult, GenerateError> {
    request.validate()?;

    let prompt = build_prompt(request);
    let raw = gateway.complete(&prompt).await?;
    let result = sanitize(&raw)?;

    tracing::info!(
        user_stories = result.user_stories.len(),
        engineering_tasks = result.engineering_tasks.len(),
        risks = result.risks.len(),
        "generation complete"
    );

    Ok(result)
}
