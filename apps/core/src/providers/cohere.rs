//! Cohere v1 chat endpoint.

use super::{ChatProvider, CompletionRequest, ProviderFailure, MAX_TOKENS, TEMPERATURE};
use crate::models::{ProviderConfig, Role};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct HistoryEntry<'a> {
    role: &'static str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct CohereChatBody<'a> {
    model: &'a str,
    message: &'a str,
    preamble: &'a str,
    chat_history: Vec<HistoryEntry<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CohereChatReply {
    #[serde(default)]
    text: Option<String>,
}

fn cohere_role(role: Role) -> &'static str {
    match role {
        Role::User => "USER",
        Role::Assistant => "CHATBOT",
        Role::System => "SYSTEM",
    }
}

pub struct CohereProvider {
    config: ProviderConfig,
    client: Client,
}

impl CohereProvider {
    pub fn new(config: ProviderConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl ChatProvider for CohereProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    #[instrument(skip_all, fields(provider = %self.config.name))]
    async fn send(&self, request: &CompletionRequest) -> Result<String, ProviderFailure> {
        let body = CohereChatBody {
            model: request.model_for(&self.config),
            message: &request.message,
            preamble: &request.system_prompt,
            chat_history: request
                .history
                .iter()
                .map(|turn| HistoryEntry {
                    role: cohere_role(turn.role),
                    message: &turn.content,
                })
                .collect(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        debug!(model = body.model, turns = body.chat_history.len(), "Sending Cohere chat");

        let response = self
            .client
            .post(format!("{}/chat", self.config.endpoint))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ProviderFailure::from_status(status, &text));
        }

        let reply: CohereChatReply = serde_json::from_str(&text)
            .map_err(|e| ProviderFailure::malformed(format!("invalid Cohere JSON: {}", e)))?;

        reply
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderFailure::malformed("Cohere reply had no text"))
    }
}
