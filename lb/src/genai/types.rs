//! Request/response types for the generative AI service
//!
//! Modeled on Gemini's `generateContent` but kept provider-neutral: one text
//! request shape and one image request shape.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Wire name used by the service
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One turn of the encouragement conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        debug!("ChatMessage::user: called");
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a model (assistant) message
    pub fn model(text: impl Into<String>) -> Self {
        debug!("ChatMessage::model: called");
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// A text generation request
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    /// Model identifier
    pub model: String,

    /// Persona/system instruction
    pub system_instruction: String,

    /// Conversation turns, oldest first
    pub contents: Vec<ChatMessage>,

    pub temperature: f32,

    pub top_p: f32,
}

/// Response from a text request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextResponse {
    /// Concatenated text parts of the first candidate, if any
    pub text: Option<String>,
}

/// An image generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Model identifier
    pub model: String,

    pub prompt: String,

    /// Aspect ratio such as "1:1"
    pub aspect_ratio: String,
}

/// Inline base64 image returned by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,

    /// Base64 payload
    pub data: String,
}

impl InlineImage {
    /// Render as a `data:` URI suitable for an `<img src>`
    pub fn data_uri(&self) -> String {
        let mime = if self.mime_type.is_empty() {
            "image/png"
        } else {
            self.mime_type.as_str()
        };
        format!("data:{};base64,{}", mime, self.data)
    }
}
