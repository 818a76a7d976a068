//! Generative AI error types

use thiserror::Error;

/// Errors that can occur talking to the generative AI service
///
/// These never leave the advice/illustration layer; callers there replace
/// them with a fallback value.
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GenAiError {
    /// HTTP status if the service answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            GenAiError::ApiError { status, .. } => Some(*status),
            GenAiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
