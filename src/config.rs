use std::env;
use std::path::PathBuf;

use log::{debug, error, info};
use poise::serenity_prelude::UserId;

use crate::error::{BotError, Result};
use crate::types::BotIdentity;

const DEFAULT_BOT_USERNAME: &str = "nguyenle9292";
const DEFAULT_BOT_USER_ID: u64 = 1_399_976_425_221_521_538;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_MAX_HISTORY_LENGTH: usize = 50;
const DEFAULT_HISTORY_DIR: &str = "history";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub google_api_key: String,
    pub gemini_model: String,
    pub bot_identity: BotIdentity,
    pub max_history_length: usize,
    pub history_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let discord_token = env::var("DISCORD_TOKEN").map_err(|e| {
            error!("Failed to load DISCORD_TOKEN from environment: {e}");
            e
        })?;

        let google_api_key = env::var("GOOGLE_API_KEY").map_err(|e| {
            error!("Failed to load GOOGLE_API_KEY from environment: {e}");
            e
        })?;

        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

        let bot_username =
            env::var("BOT_USERNAME").unwrap_or_else(|_| DEFAULT_BOT_USERNAME.to_string());

        let bot_user_id = match env::var("BOT_USER_ID") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                error!("Failed to parse BOT_USER_ID: {e}");
                BotError::Config(format!("BOT_USER_ID must be a u64: {e}"))
            })?,
            Err(_) => DEFAULT_BOT_USER_ID,
        };
        if bot_user_id == 0 {
            return Err(BotError::Config("BOT_USER_ID must be non-zero".to_string()));
        }

        let max_history_length = match env::var("MAX_HISTORY_LENGTH") {
            Ok(raw) => raw.parse::<usize>().map_err(|e| {
                error!("Failed to parse MAX_HISTORY_LENGTH: {e}");
                BotError::Config(format!("MAX_HISTORY_LENGTH must be a usize: {e}"))
            })?,
            Err(_) => DEFAULT_MAX_HISTORY_LENGTH,
        };

        let history_dir = env::var("HISTORY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_HISTORY_DIR));

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!("Google API key length: {} characters", google_api_key.len());
        debug!("Gemini model: {gemini_model}");
        debug!("Bot identity: {bot_username} ({bot_user_id})");
        debug!("Max history length: {max_history_length}");
        debug!("History directory: {}", history_dir.display());

        Ok(Self {
            discord_token,
            google_api_key,
            gemini_model,
            bot_identity: BotIdentity {
                username: bot_username,
                user_id: UserId::new(bot_user_id),
            },
            max_history_length,
            history_dir,
        })
    }
}
