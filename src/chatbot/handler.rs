//! Main handler for incoming channel messages.

use log::{debug, error, info};
use poise::serenity_prelude::{ChannelId, Context, Message as SerenityMessage};

use crate::bot::Data;
use crate::error::{APOLOGY_REPLY, Result};
use crate::types::Turn;

use super::mention::is_addressed_to;
use super::prompt::build_prompt;

/// Handle a channel message: answer it if it mentions the bot identity,
/// otherwise record it as conversation context.
pub async fn handle_message(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
) -> Result<()> {
    // Never respond to or record other bots
    if new_message.author.bot {
        return Ok(());
    }

    let channel_id = new_message.channel_id;

    if !is_addressed_to(new_message, data.bot_identity()) {
        debug!("Recording message in channel {channel_id} as context");
        if let Err(e) = record_message(data, channel_id, &new_message.content).await {
            error!("Failed to record message in channel {channel_id}: {e}");
            new_message.reply(&ctx.http, APOLOGY_REPLY).await?;
        }
        return Ok(());
    }

    info!(
        "Received mention from {} in channel {channel_id}: {}",
        new_message.author.tag(),
        new_message.content
    );

    if let Err(e) = channel_id.broadcast_typing(&ctx.http).await {
        debug!("Failed to broadcast typing indicator: {e}");
    }

    match respond(data, channel_id, &new_message.content).await {
        Ok(reply) => {
            new_message.reply(&ctx.http, &reply).await?;
            info!(
                "Replied to {} in channel {channel_id}: {reply}",
                new_message.author.tag()
            );
        }
        Err(e) => {
            error!(
                "Error processing mention from {}: {e}",
                new_message.author.tag()
            );
            new_message.reply(&ctx.http, APOLOGY_REPLY).await?;
        }
    }

    Ok(())
}

/// Append a non-mention message to the channel history.
async fn record_message(data: &Data, channel_id: ChannelId, text: &str) -> Result<()> {
    let _guard = data.channel_locks().acquire(channel_id).await;

    let mut history = data.history_store().load(channel_id).await?;
    history.push(Turn::user(text));
    data.history_store().save(channel_id, history).await
}

/// Generate a reply to a mention and persist the exchange.
///
/// The persona prompt goes to the API; only the raw message text is persisted.
async fn respond(data: &Data, channel_id: ChannelId, text: &str) -> Result<String> {
    let _guard = data.channel_locks().acquire(channel_id).await;

    let mut history = data.history_store().load(channel_id).await?;
    debug!(
        "Loaded {} turns of context for channel {channel_id}",
        history.len()
    );

    let prompt = build_prompt(&data.bot_identity().username, text);
    let reply = data.gemini_client().generate(&history, &prompt).await?;

    history.push(Turn::user(text));
    history.push(Turn::model(reply.as_str()));
    data.history_store().save(channel_id, history).await?;

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use poise::serenity_prelude::UserId;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::error::BotError;
    use crate::gemini::GeminiClient;
    use crate::history::HistoryStore;
    use crate::types::{BotIdentity, Role};

    fn test_identity() -> BotIdentity {
        BotIdentity {
            username: "nguyenle9292".to_string(),
            user_id: UserId::new(1),
        }
    }

    fn test_data(dir: &std::path::Path, max_len: usize) -> Data {
        Data::new(
            GeminiClient::new("test-key".to_string(), "test-model".to_string()),
            HistoryStore::new(dir, max_len).unwrap(),
            test_identity(),
        )
    }

    // One-shot HTTP server: accept a single connection, read the request,
    // answer with `body` as JSON, and hand the raw request bytes back.
    async fn serve_canned_reply(listener: TcpListener, body: String) -> Vec<u8> {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request_is_complete(&request) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        request
    }

    fn request_is_complete(request: &[u8]) -> bool {
        let Some(header_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
        let body_len = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|len| len.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + body_len
    }

    #[tokio::test]
    async fn record_appends_one_user_turn() {
        let dir = tempfile::tempdir().unwrap();
        let data = test_data(dir.path(), 50);
        let channel = ChannelId::new(42);

        record_message(&data, channel, "Hello").await.unwrap();

        let history = data.history_store().load(channel).await.unwrap();
        assert_eq!(history, vec![Turn::user("Hello")]);
    }

    #[tokio::test]
    async fn record_accumulates_context() {
        let dir = tempfile::tempdir().unwrap();
        let data = test_data(dir.path(), 50);
        let channel = ChannelId::new(42);

        record_message(&data, channel, "first").await.unwrap();
        record_message(&data, channel, "second").await.unwrap();

        let history = data.history_store().load(channel).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].text(), "second");
    }

    #[tokio::test]
    async fn concurrent_records_lose_no_updates() {
        let dir = tempfile::tempdir().unwrap();
        let data = Arc::new(test_data(dir.path(), 50));
        let channel = ChannelId::new(42);

        let tasks: Vec<_> = (0..10)
            .map(|i| {
                let data = Arc::clone(&data);
                tokio::spawn(async move {
                    let text = format!("message {i}");
                    record_message(&data, channel, &text).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let history = data.history_store().load(channel).await.unwrap();
        assert_eq!(history.len(), 10);
        assert!(history.iter().all(|turn| turn.role == Role::User));
    }

    #[tokio::test]
    async fn record_failure_surfaces_corrupt_history() {
        let dir = tempfile::tempdir().unwrap();
        let data = test_data(dir.path(), 50);
        let channel = ChannelId::new(42);

        std::fs::write(dir.path().join("42.json"), "not json").unwrap();

        let result = record_message(&data, channel, "Hello").await;
        assert!(matches!(result, Err(BotError::CorruptHistory { .. })));
    }

    #[tokio::test]
    async fn respond_persists_exchange_and_replies_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let canned = r#"{
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "Hi there" }] } }
            ]
        }"#;
        let server = tokio::spawn(serve_canned_reply(listener, canned.to_string()));

        let gemini = GeminiClient::new("test-key".to_string(), "test-model".to_string())
            .with_base_url(format!("http://{addr}"));
        let data = Data::new(
            gemini,
            HistoryStore::new(dir.path(), 50).unwrap(),
            test_identity(),
        );
        let channel = ChannelId::new(42);

        let reply = respond(&data, channel, "Hello").await.unwrap();
        assert_eq!(reply, "Hi there");

        let request = String::from_utf8(server.await.unwrap()).unwrap();
        assert!(request.starts_with("POST /test-model:generateContent"));
        assert!(request.contains("x-goog-api-key: test-key"));

        let history = data.history_store().load(channel).await.unwrap();
        assert_eq!(history, vec![Turn::user("Hello"), Turn::model("Hi there")]);
    }
}
