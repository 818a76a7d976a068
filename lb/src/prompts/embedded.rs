//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Persona instruction for the encouragement chat
pub const ADVICE_SYSTEM: &str = include_str!("../../prompts/advice-system.pmt");

/// Opening request asking for a verdict on a fresh lunchbox
pub const ADVICE_VERDICT: &str = include_str!("../../prompts/advice-verdict.pmt");

/// Illustration prompt
pub const IMAGE: &str = include_str!("../../prompts/image.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "advice-system" => Some(ADVICE_SYSTEM),
        "advice-verdict" => Some(ADVICE_VERDICT),
        "image" => Some(IMAGE),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
