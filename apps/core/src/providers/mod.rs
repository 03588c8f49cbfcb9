//! External LLM providers.
//!
//! Each provider speaks its own chat schema but exposes the same
//! [`ChatProvider`] interface, so the router can iterate them in priority
//! order without knowing which is which.

pub mod cohere;
pub mod failure;
pub mod openai;
pub mod router;

use crate::models::{ProviderConfig, ProviderKind, Role};
use async_trait::async_trait;
use std::sync::Arc;

pub use failure::{FailureKind, ProviderFailure};
pub use router::{ProviderRouter, RouteOutcome};

/// Upper bound on generated tokens for every provider call.
pub const MAX_TOKENS: u32 = 400;
pub const TEMPERATURE: f32 = 0.7;

/// One prior message forwarded as context.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Provider-neutral completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    /// Oldest first, excluding the current message.
    pub history: Vec<ChatTurn>,
    pub message: String,
    /// Use the provider's reasoning model instead of its general one.
    pub use_reasoning_model: bool,
}

impl CompletionRequest {
    pub fn model_for<'a>(&self, config: &'a ProviderConfig) -> &'a str {
        if self.use_reasoning_model {
            &config.reasoning_model
        } else {
            &config.general_model
        }
    }
}

/// Defines the public interface for an external chat-completion provider.
#[async_trait]
pub trait ChatProvider: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Sends one request and normalizes the reply to plain text.
    async fn send(&self, request: &CompletionRequest) -> Result<String, ProviderFailure>;
}

/// Instantiates adapters for the configured providers, keeping their order.
pub fn build_providers(
    configs: &[ProviderConfig],
    client: reqwest::Client,
    app_title: &str,
) -> Vec<Arc<dyn ChatProvider>> {
    configs
        .iter()
        .map(|config| -> Arc<dyn ChatProvider> {
            match config.kind {
                ProviderKind::Cohere => {
                    Arc::new(cohere::CohereProvider::new(config.clone(), client.clone()))
                }
                ProviderKind::OpenAiCompatible => {
                    let mut provider =
                        openai::OpenAiCompatibleProvider::new(config.clone(), client.clone());
                    if config.name == "openrouter" {
                        provider = provider
                            .with_header("HTTP-Referer", "http://localhost")
                            .with_header("X-Title", app_title);
                    }
                    Arc::new(provider)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str, kind: ProviderKind) -> ProviderConfig {
        ProviderConfig {
            name: name.to_string(),
            kind,
            endpoint: "http://localhost:1".to_string(),
            api_key: "k".to_string(),
            general_model: "small".to_string(),
            reasoning_model: "large".to_string(),
            priority: 0,
        }
    }

    #[test]
    fn test_build_providers_keeps_order() {
        let configs = vec![
            config("cohere", ProviderKind::Cohere),
            config("groq", ProviderKind::OpenAiCompatible),
        ];
        let providers = build_providers(&configs, reqwest::Client::new(), "Clang");
        let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["cohere", "groq"]);
    }

    #[test]
    fn test_model_selection() {
        let config = config("groq", ProviderKind::OpenAiCompatible);
        let mut request = CompletionRequest {
            system_prompt: String::new(),
            history: vec![],
            message: "hi".into(),
            use_reasoning_model: false,
        };
        assert_eq!(request.model_for(&config), "small");
        request.use_reasoning_model = true;
        assert_eq!(request.model_for(&config), "large");
    }
}
