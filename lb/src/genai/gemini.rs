//! Gemini API client implementation
//!
//! Implements the GenAiClient trait against the Gemini `generateContent`
//! REST endpoint, for both text and image models.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{GenAiClient, GenAiError, ImageRequest, InlineImage, TextRequest, TextResponse};
use crate::config::GenAiConfig;

/// Gemini API client
pub struct GeminiClient {
    /// Missing keys fail each request instead of construction
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config. A
    /// missing key is logged; requests then fail with a config error.
    pub fn from_config(config: &GenAiConfig) -> Result<Self, GenAiError> {
        debug!(base_url = %config.base_url, timeout_ms = config.timeout_ms, "from_config: called");
        let api_key = match config.get_api_key() {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, "from_config: no API key, requests will use fallbacks");
                None
            }
        };

        Self::new(api_key, config.base_url.clone(), Duration::from_millis(config.timeout_ms))
    }

    pub fn new(api_key: Option<String>, base_url: String, timeout: Duration) -> Result<Self, GenAiError> {
        let http = Client::builder().timeout(timeout).build().map_err(GenAiError::Network)?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Build the request body for a text request
    fn build_text_body(&self, request: &TextRequest) -> serde_json::Value {
        debug!(model = %request.model, turns = request.contents.len(), "build_text_body: called");
        let contents: Vec<serde_json::Value> = request
            .contents
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role.as_str(),
                    "parts": [{ "text": msg.text }],
                })
            })
            .collect();

        serde_json::json!({
            "systemInstruction": {
                "parts": [{ "text": request.system_instruction }],
            },
            "contents": contents,
            "generationConfig": {
                "temperature": request.temperature,
                "topP": request.top_p,
            },
        })
    }

    /// Build the request body for an image request
    fn build_image_body(&self, request: &ImageRequest) -> serde_json::Value {
        debug!(model = %request.model, aspect_ratio = %request.aspect_ratio, "build_image_body: called");
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": {
                "responseModalities": ["IMAGE"],
                "imageConfig": {
                    "aspectRatio": request.aspect_ratio,
                },
            },
        })
    }

    async fn post(&self, model: &str, body: &serde_json::Value) -> Result<GeminiResponse, GenAiError> {
        let url = self.endpoint(model);
        debug!(%url, "post: called");
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenAiError::Config("API key not set".to_string()))?;

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "post: API error");
            return Err(GenAiError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        debug!("post: success");
        let text = response.text().await?;
        decode_response(&text)
    }
}

/// Decode a `generateContent` response body
fn decode_response(body: &str) -> Result<GeminiResponse, GenAiError> {
    Ok(serde_json::from_str(body)?)
}

/// Concatenate the visible text parts of the first candidate
fn parse_text(response: GeminiResponse) -> TextResponse {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    TextResponse {
        text: if text.is_empty() { None } else { Some(text) },
    }
}

/// First inline image part of the first candidate
fn parse_image(response: GeminiResponse) -> Option<InlineImage> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().find_map(|p| p.inline_data))
        .map(|data| InlineImage {
            mime_type: data.mime_type.unwrap_or_default(),
            data: data.data,
        })
}

#[async_trait]
impl GenAiClient for GeminiClient {
    async fn generate_text(&self, request: TextRequest) -> Result<TextResponse, GenAiError> {
        debug!(model = %request.model, "generate_text: called");
        let body = self.build_text_body(&request);
        let response = self.post(&request.model, &body).await?;
        Ok(parse_text(response))
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<Option<InlineImage>, GenAiError> {
        debug!(model = %request.model, "generate_image: called");
        let body = self.build_image_body(&request);
        let response = self.post(&request.model, &body).await?;
        let image = parse_image(response);
        debug!(found = image.is_some(), "generate_image: parsed");
        Ok(image)
    }
}

// Gemini API response types

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: Option<String>,
    data: String,
}
