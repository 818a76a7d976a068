//! Prompt templates
//!
//! Embedded defaults with optional on-disk overrides.

mod embedded;
mod loader;

pub use loader::{AdviceContext, ImageContext, PromptLoader};
