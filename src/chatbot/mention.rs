//! Mention detection against the configured bot identity.

use poise::serenity_prelude::{Message as SerenityMessage, UserId};

use crate::types::BotIdentity;

/// Whether `message` mentions the identity the bot answers for.
#[must_use]
pub fn is_addressed_to(message: &SerenityMessage, identity: &BotIdentity) -> bool {
    message
        .mentions
        .iter()
        .any(|user| mentions_identity(&user.name, user.id, identity))
}

fn mentions_identity(username: &str, user_id: UserId, identity: &BotIdentity) -> bool {
    username == identity.username || user_id == identity.user_id
}
