//! Common types used throughout the anhbot bot.

use poise::serenity_prelude::UserId;
use serde::{Deserialize, Serialize};

/// Role of a turn in a conversation.
///
/// Maps to Gemini API content roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Turn from the human side of the channel
    User,
    /// Turn generated by the model
    Model,
}

/// One text segment of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One exchange unit in a conversation.
///
/// The same shape is persisted to the history file and sent to the Gemini
/// API as a `Content` object: `{ "role": ..., "parts": [{ "text": ... }] }`.
/// `parts` is never empty; the constructors build single-part turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    /// A user turn wrapping a single text part.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// A model turn wrapping a single text part.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// Concatenated text of all parts.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts.iter().map(|part| part.text.as_str()).collect()
    }
}

/// The identity the bot answers for, matched against message mentions.
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub username: String,
    pub user_id: UserId,
}
