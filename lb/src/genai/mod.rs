//! Generative AI client module
//!
//! Provider-neutral client trait plus the Gemini implementation used for
//! both the encouragement chat and the lunchbox illustrations.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod types;

pub use client::GenAiClient;
pub use error::GenAiError;
pub use gemini::GeminiClient;
pub use types::{ChatMessage, ImageRequest, InlineImage, Role, TextRequest, TextResponse};

use crate::config::GenAiConfig;

/// Create a client for the provider named in config
pub fn create_client(config: &GenAiConfig) -> Result<Arc<dyn GenAiClient>, GenAiError> {
    debug!(provider = %config.provider, "create_client: called");
    match config.provider.as_str() {
        "gemini" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(GenAiError::Config(format!(
                "Unknown generative AI provider: '{}'. Supported: gemini",
                other
            )))
        }
    }
}
