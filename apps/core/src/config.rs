use crate::error::AppError;
use crate::models::{ProviderConfig, ProviderKind};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(AppError::Config(format!(
                "LOG_FORMAT must be 'json' or 'pretty', got '{}'",
                other
            ))),
        }
    }
}

/// Built-in provider defaults, keyed by lower-case name.
struct ProviderPreset {
    name: &'static str,
    kind: ProviderKind,
    base_url: &'static str,
    general_model: &'static str,
    reasoning_model: &'static str,
}

const PRESETS: &[ProviderPreset] = &[
    ProviderPreset {
        name: "openrouter",
        kind: ProviderKind::OpenAiCompatible,
        base_url: "https://openrouter.ai/api/v1",
        general_model: "google/gemma-2-9b-it:free",
        reasoning_model: "tngtech/deepseek-r1t2-chimera:free",
    },
    ProviderPreset {
        name: "cohere",
        kind: ProviderKind::Cohere,
        base_url: "https://api.cohere.ai/v1",
        general_model: "command",
        reasoning_model: "command-r-plus",
    },
    ProviderPreset {
        name: "groq",
        kind: ProviderKind::OpenAiCompatible,
        base_url: "https://api.groq.com/openai/v1",
        general_model: "llama3-8b-8192",
        reasoning_model: "llama3-70b-8192",
    },
    ProviderPreset {
        name: "mistral",
        kind: ProviderKind::OpenAiCompatible,
        base_url: "https://api.mistral.ai/v1",
        general_model: "mistral-small",
        reasoning_model: "mistral-large-latest",
    },
    ProviderPreset {
        name: "together",
        kind: ProviderKind::OpenAiCompatible,
        base_url: "https://api.together.xyz/v1",
        general_model: "meta-llama/Llama-2-7b-chat-hf",
        reasoning_model: "meta-llama/Llama-3-70b-chat-hf",
    },
];

const DEFAULT_ORDER: &str = "openrouter,cohere,groq,mistral,together";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub assistant_name: String,
    /// Upper bound on a single provider call.
    pub provider_timeout: Duration,
    /// How many prior messages are forwarded to providers.
    pub history_turns: usize,
    pub essay_target_words: usize,
    /// Chat requests per client per minute; 0 disables limiting.
    pub rate_limit_per_minute: usize,
    pub log_format: LogFormat,
    /// Providers with credentials, in priority order.
    pub providers: Vec<ProviderConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR: {}", e)))?;

        let provider_timeout =
            Duration::from_secs(parse_number(&get, "PROVIDER_TIMEOUT_SECS", 15)?);
        if provider_timeout.is_zero() {
            return Err(AppError::Config(
                "PROVIDER_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let log_format = match get("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::Json,
        };

        let order = get("PROVIDER_ORDER").unwrap_or_else(|| DEFAULT_ORDER.to_string());
        let providers = resolve_providers(&order, &get)?;

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://data/chatrelay.sqlite".to_string()),
            assistant_name: get("ASSISTANT_NAME").unwrap_or_else(|| "Clang".to_string()),
            provider_timeout,
            history_turns: parse_number(&get, "HISTORY_TURNS", 6)? as usize,
            essay_target_words: parse_number(&get, "ESSAY_TARGET_WORDS", 200)? as usize,
            rate_limit_per_minute: parse_number(&get, "RATE_LIMIT_PER_MINUTE", 30)? as usize,
            log_format,
            providers,
        })
    }
}

fn parse_number<G>(get: &G, key: &str, default: u64) -> Result<u64, AppError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| AppError::Config(format!("{}: {}", key, e))),
        None => Ok(default),
    }
}

fn resolve_providers<G>(order: &str, get: &G) -> Result<Vec<ProviderConfig>, AppError>
where
    G: Fn(&str) -> Option<String>,
{
    let mut providers = Vec::new();

    for name in order
        .split(',')
        .map(|n| n.trim().to_ascii_lowercase())
        .filter(|n| !n.is_empty())
    {
        let preset = PRESETS
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| {
                AppError::Config(format!("Unknown provider in PROVIDER_ORDER: {}", name))
            })?;

        if providers.iter().any(|p: &ProviderConfig| p.name == name) {
            return Err(AppError::Config(format!(
                "Provider listed twice in PROVIDER_ORDER: {}",
                name
            )));
        }

        let prefix = name.to_ascii_uppercase();
        let Some(api_key) = get(&format!("{}_API_KEY", prefix)) else {
            continue;
        };

        let endpoint = match get(&format!("{}_BASE_URL", prefix)) {
            Some(raw) => Url::parse(&raw)?.to_string(),
            None => preset.base_url.to_string(),
        };

        providers.push(ProviderConfig {
            name: preset.name.to_string(),
            kind: preset.kind,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            general_model: get(&format!("{}_MODEL", prefix))
                .unwrap_or_else(|| preset.general_model.to_string()),
            reasoning_model: get(&format!("{}_REASONING_MODEL", prefix))
                .unwrap_or_else(|| preset.reasoning_model.to_string()),
            priority: providers.len(),
        });
    }

    Ok(providers)
}
