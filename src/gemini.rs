use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};
use crate::types::Turn;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// Discord caps messages at 2000 characters; at roughly 4 characters per
// token, 512 output tokens stays safely under the limit.
const MAX_OUTPUT_TOKENS: u32 = 512;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Turn>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

/// Response shapes the generateContent API returns.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateContentResponse {
    /// The documented shape, a list of candidate contents
    Candidates { candidates: Vec<Candidate> },
    /// Bare-text fallback some responses carry instead
    Text { text: String },
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Turn,
}

pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            base_url: GEMINI_API_URL.to_string(),
            client: reqwest::Client::new(),
            model,
        }
    }

    /// Replace the endpoint base URL (the public Google endpoint by default).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Generate a reply to `prompt`, sending `history` as prior context.
    pub async fn generate(&self, history: &[Turn], prompt: &str) -> Result<String> {
        debug!(
            "Sending generateContent request with {} history turns",
            history.len()
        );

        // The prompt rides along as one final user turn
        let mut contents = history.to_vec();
        contents.push(Turn::user(prompt));

        let request = GenerateContentRequest {
            contents,
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let url = format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(BotError::GeminiApi { status, message });
        }

        let body = response.text().await?;
        let reply = extract_reply_text(&body)?;
        debug!("Received reply of {} characters", reply.len());
        Ok(reply)
    }
}

fn extract_reply_text(body: &str) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| BotError::GeminiResponse(format!("Unrecognized response shape: {e}")))?;

    match response {
        GenerateContentResponse::Candidates { candidates } => {
            let candidate = candidates
                .first()
                .ok_or_else(|| BotError::GeminiResponse("No candidates in response".to_string()))?;
            Ok(candidate.content.text())
        }
        GenerateContentResponse::Text { text } => Ok(text),
    }
}
