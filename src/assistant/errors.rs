use thiserror::Error;

use crate::domain::messaging::GatewayError;
use crate::domain::repositories::RepositoryError;

/// Errors that can occur while producing a reply
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("LLM API error: {0}")]
    Llm(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected model output: {0}")]
    InvalidOutput(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type AssistantResult<T> = Result<T, AssistantError>;
