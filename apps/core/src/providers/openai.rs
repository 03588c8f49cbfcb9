//! OpenAI-compatible chat completions (OpenRouter, Groq, Mistral, Together).

use super::{ChatProvider, CompletionRequest, ProviderFailure, MAX_TOKENS, TEMPERATURE};
use crate::models::ProviderConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionReply {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiCompatibleProvider {
    config: ProviderConfig,
    client: Client,
    extra_headers: Vec<(String, String)>,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: ProviderConfig, client: Client) -> Self {
        Self {
            config,
            client,
            extra_headers: Vec::new(),
        }
    }

    /// Adds a static header sent with every request.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.extra_headers.push((name.to_string(), value.to_string()));
        self
    }

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatCompletionBody<'a> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(WireMessage {
            role: "system",
            content: &request.system_prompt,
        });
        messages.extend(request.history.iter().map(|turn| WireMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));
        messages.push(WireMessage {
            role: "user",
            content: &request.message,
        });

        ChatCompletionBody {
            model: request.model_for(&self.config),
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    #[instrument(skip_all, fields(provider = %self.config.name))]
    async fn send(&self, request: &CompletionRequest) -> Result<String, ProviderFailure> {
        let body = self.build_body(request);
        debug!(model = body.model, turns = body.messages.len(), "Sending chat completion");

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.config.endpoint))
            .bearer_auth(&self.config.api_key)
            .json(&body);
        for (name, value) in &self.extra_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ProviderFailure::from_status(status, &text));
        }

        let reply: ChatCompletionReply = serde_json::from_str(&text)
            .map_err(|e| ProviderFailure::malformed(format!("invalid completion JSON: {}", e)))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ProviderFailure::malformed("completion had no content"))
    }
}
