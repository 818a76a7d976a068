//! Encouragement chat ("Madpakke-Magikeren")
//!
//! Turns a selection and the conversation so far into a short, upbeat reply.
//! Service failures never escape: they are logged and replaced by a fixed
//! fallback line.

use std::sync::Arc;

use eyre::Result;
use tracing::{debug, warn};

use crate::config::AdviceConfig;
use crate::domain::Selection;
use crate::genai::{ChatMessage, GenAiClient, GenAiError, TextRequest};
use crate::prompts::{AdviceContext, PromptLoader};

/// Reply used when the service cannot be reached or errors
pub const ERROR_FALLBACK: &str = "UPS! En magisk røgsky blokerede vejen! Prøv igen! 💨✨";

/// Reply used when the service answers with nothing usable
pub const EMPTY_FALLBACK: &str = "KAPOW! Din krop vil elske det her! ✨";

/// Placeholder for a category that has not been chosen
const NOT_CHOSEN: &str = "Ikke valgt";

/// Multi-line Danish summary of a selection, one line per category
pub fn selection_summary(selection: &Selection) -> String {
    let mut summary = String::from("Ingredienser:");
    for (category, item) in selection.slots() {
        let name = item.map(|i| i.name).unwrap_or(NOT_CHOSEN);
        summary.push_str(&format!("\n  {}: {}", category.label(), name));
    }
    summary
}

/// Strip asterisks; fall back to [`EMPTY_FALLBACK`] when nothing is left
pub fn clean_reply(text: Option<String>) -> String {
    let cleaned = text.unwrap_or_default().replace('*', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        debug!("clean_reply: empty reply, using fallback");
        EMPTY_FALLBACK.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Advice client
pub struct Advisor {
    client: Arc<dyn GenAiClient>,
    prompts: Arc<PromptLoader>,
    settings: AdviceConfig,
}

impl Advisor {
    pub fn new(client: Arc<dyn GenAiClient>, prompts: Arc<PromptLoader>, settings: AdviceConfig) -> Self {
        debug!(model = %settings.model, "Advisor::new: called");
        Self {
            client,
            prompts,
            settings,
        }
    }

    /// Get a reply for the conversation so far
    ///
    /// An empty transcript asks for a one-shot verdict on the selection;
    /// otherwise the transcript is sent as multi-turn context. The selection
    /// is always part of the persona instruction. Never fails.
    pub async fn advise(&self, transcript: &[ChatMessage], selection: &Selection) -> String {
        debug!(turns = transcript.len(), "Advisor::advise: called");
        match self.try_advise(transcript, selection).await {
            Ok(reply) => reply,
            Err(e) => {
                let status = e.downcast_ref::<GenAiError>().and_then(GenAiError::status);
                warn!(error = %e, ?status, "Advisor::advise: request failed, using fallback");
                ERROR_FALLBACK.to_string()
            }
        }
    }

    async fn try_advise(&self, transcript: &[ChatMessage], selection: &Selection) -> Result<String> {
        let request = self.build_request(transcript, selection)?;
        let response = self.client.generate_text(request).await?;
        Ok(clean_reply(response.text))
    }

    fn build_request(&self, transcript: &[ChatMessage], selection: &Selection) -> Result<TextRequest> {
        let context = AdviceContext {
            summary: selection_summary(selection),
        };
        let system_instruction = self.prompts.render("advice-system", &context)?;

        let contents = if transcript.is_empty() {
            debug!("Advisor::build_request: empty transcript, asking for verdict");
            vec![ChatMessage::user(self.prompts.render("advice-verdict", &context)?)]
        } else {
            transcript.to_vec()
        };

        Ok(TextRequest {
            model: self.settings.model.clone(),
            system_instruction,
            contents,
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
        })
    }
}
