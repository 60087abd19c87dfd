//! Discord bot core logic and event handling.

use std::error::Error as StdError;

use log::{debug, info};
use poise::{
    Framework, FrameworkOptions,
    serenity_prelude::{ClientBuilder, Context, FullEvent, GatewayIntents},
};

use crate::chatbot;
use crate::config::Config;
use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::history::{ChannelLocks, HistoryStore};
use crate::types::BotIdentity;

type EventResult = std::result::Result<(), Box<dyn StdError + Send + Sync>>;

/// Shared data available to all event handlers
pub struct Data {
    gemini_client: GeminiClient,
    history_store: HistoryStore,
    channel_locks: ChannelLocks,
    bot_identity: BotIdentity,
}

impl Data {
    #[must_use]
    pub fn new(
        gemini_client: GeminiClient,
        history_store: HistoryStore,
        bot_identity: BotIdentity,
    ) -> Self {
        Self {
            gemini_client,
            history_store,
            channel_locks: ChannelLocks::new(),
            bot_identity,
        }
    }

    #[must_use]
    pub fn gemini_client(&self) -> &GeminiClient {
        &self.gemini_client
    }

    #[must_use]
    pub fn history_store(&self) -> &HistoryStore {
        &self.history_store
    }

    #[must_use]
    pub fn channel_locks(&self) -> &ChannelLocks {
        &self.channel_locks
    }

    #[must_use]
    pub fn bot_identity(&self) -> &BotIdentity {
        &self.bot_identity
    }
}

/// Run the Discord bot.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Initializing Gemini client");
    let gemini_client = GeminiClient::new(config.google_api_key, config.gemini_model);

    debug!(
        "Initializing history store at {}",
        config.history_dir.display()
    );
    let history_store = HistoryStore::new(config.history_dir, config.max_history_length)?;
    let bot_identity = config.bot_identity;

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            ..Default::default()
        })
        .setup(move |_ctx, _ready, _framework| {
            Box::pin(async move {
                info!("Bot is ready and connected to Discord");
                Ok(Data::new(gemini_client, history_store, bot_identity))
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

async fn event_handler(ctx: &Context, event: &FullEvent, data: &Data) -> EventResult {
    if let FullEvent::Message { new_message } = event {
        chatbot::handle_message(ctx, new_message, data).await?;
    }
    Ok(())
}
