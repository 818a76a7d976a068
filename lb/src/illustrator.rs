//! Lunchbox illustrations
//!
//! Asks the image model for a square picture of a selection. Errors and
//! empty answers both come back as `None`.

use std::sync::Arc;

use eyre::Result;
use tracing::{debug, warn};

use crate::config::ImageConfig;
use crate::domain::Selection;
use crate::genai::{GenAiClient, GenAiError, ImageRequest};
use crate::prompts::{ImageContext, PromptLoader};

/// "a, b, c, and d" style list of the chosen item names
pub fn ingredient_list(selection: &Selection) -> String {
    let names: Vec<&str> = selection.chosen().map(|item| item.name).collect();
    match names.as_slice() {
        [] => "an assortment of healthy snacks".to_string(),
        [only] => only.to_string(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

/// Image client
pub struct Illustrator {
    client: Arc<dyn GenAiClient>,
    prompts: Arc<PromptLoader>,
    settings: ImageConfig,
}

impl Illustrator {
    pub fn new(client: Arc<dyn GenAiClient>, prompts: Arc<PromptLoader>, settings: ImageConfig) -> Self {
        debug!(model = %settings.model, "Illustrator::new: called");
        Self {
            client,
            prompts,
            settings,
        }
    }

    /// Generate an illustration as a data URI, or `None`
    pub async fn illustrate(&self, selection: &Selection) -> Option<String> {
        debug!(items = selection.chosen().count(), "Illustrator::illustrate: called");
        match self.try_illustrate(selection).await {
            Ok(image) => image,
            Err(e) => {
                let status = e.downcast_ref::<GenAiError>().and_then(GenAiError::status);
                warn!(error = %e, ?status, "Illustrator::illustrate: image generation failed");
                None
            }
        }
    }

    async fn try_illustrate(&self, selection: &Selection) -> Result<Option<String>> {
        let request = self.build_request(selection)?;
        let image = self.client.generate_image(request).await?;
        if image.is_none() {
            debug!("Illustrator::try_illustrate: service returned no image data");
        }
        Ok(image.map(|i| i.data_uri()))
    }

    fn build_request(&self, selection: &Selection) -> Result<ImageRequest> {
        let context = ImageContext {
            ingredients: ingredient_list(selection),
        };
        Ok(ImageRequest {
            model: self.settings.model.clone(),
            prompt: self.prompts.render("image", &context)?,
            aspect_ratio: self.settings.aspect_ratio.clone(),
        })
    }
}
