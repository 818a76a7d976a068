//! GenAiClient trait definition

use async_trait::async_trait;

use super::{GenAiError, ImageRequest, InlineImage, TextRequest, TextResponse};

/// Stateless generative AI client - each call is independent
///
/// Conversation state lives with the caller and is sent in full with every
/// text request.
#[async_trait]
pub trait GenAiClient: Send + Sync {
    /// Generate a text reply for the given conversation
    async fn generate_text(&self, request: TextRequest) -> Result<TextResponse, GenAiError>;

    /// Generate a single image
    ///
    /// `Ok(None)` means the service answered but returned no image data.
    async fn generate_image(&self, request: ImageRequest) -> Result<Option<InlineImage>, GenAiError>;
}
