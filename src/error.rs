use std::path::PathBuf;

use poise::serenity_prelude::ChannelId;
use reqwest::StatusCode;
use thiserror::Error;

/// Fixed reply sent in Discord when handling a message fails; the real error goes to the log.
pub const APOLOGY_REPLY: &str = "Xin lỗi, anh đang gặp chút trục trặc, em thử lại sau nhé.";

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Serenity error: {0}")]
    Serenity(Box<poise::serenity_prelude::Error>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Gemini API error ({status}): {message}")]
    GeminiApi { status: StatusCode, message: String },

    #[error("Gemini response error: {0}")]
    GeminiResponse(String),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Corrupt history record for channel {channel}: {message}")]
    CorruptHistory { channel: ChannelId, message: String },

    #[error("History storage error at {}: {}", .path.display(), .message)]
    Persistence { path: PathBuf, message: String },
}

impl From<poise::serenity_prelude::Error> for BotError {
    fn from(err: poise::serenity_prelude::Error) -> Self {
        BotError::Serenity(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
