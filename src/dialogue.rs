//! Footer dialogue module for the admin conversation state.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Conversation state of a chat with the admin
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum FooterDialogueState {
    #[default]
    Idle,
    /// `/end` was sent; the next text message becomes the footer
    AwaitingFooter,
}

/// Type alias for our footer dialogue
pub type FooterDialogue = Dialogue<FooterDialogueState, InMemStorage<FooterDialogueState>>;

/// Validates footer text entered by the admin
pub fn validate_footer(text: &str) -> Result<String, &'static str> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.starts_with('/') {
        return Err("command");
    }

    if trimmed.chars().count() > 1024 {
        return Err("too_long");
    }

    Ok(trimmed.to_string())
}
