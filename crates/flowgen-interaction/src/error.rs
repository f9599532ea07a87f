use std::time::Duration;

use flowgen_core::FlowgenError;
use thiserror::Error;

/// Failures of a single generation request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The request never produced an HTTP response
    #[error("Gemini API request failed: {message}")]
    Transport { message: String, is_retryable: bool },

    /// The service answered with a non-success status
    #[error("Gemini API returned {status}: {message}")]
    Http {
        status: u16,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// No candidate carried a text part
    #[error("Gemini API returned no text in the response candidates")]
    EmptyResponse,

    /// The text did not match the `{title, mermaidCode, explanation}` shape
    #[error("Malformed diagram response: {0}")]
    MalformedResponse(String),

    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("Failed to render system instruction: {0}")]
    Instruction(String),
}

impl GenerationError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { is_retryable, .. } | Self::Http { is_retryable, .. } => *is_retryable,
            _ => false,
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Http { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<GenerationError> for FlowgenError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingApiKey => FlowgenError::config(err.to_string()),
            other => FlowgenError::generation(other.to_string()),
        }
    }
}
