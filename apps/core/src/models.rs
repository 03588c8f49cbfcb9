use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::brain::IntentTag;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            other => Err(format!("unknown message role: {}", other)),
        }
    }
}

/// Represents a chat session.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Opaque identifier supplied by the client or generated (UUID v4).
    pub id: String,
    /// Derived from the first user message; may be empty.
    pub title: String,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
    /// Unix timestamp in milliseconds, bumped on every stored message.
    pub updated_at: i64,
}

/// A session row joined with its message count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub message_count: i64,
}

/// Where the assistant's reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Rule-based reply (greeting, identity, empty input).
    Canned,
    /// Slash command output.
    Command,
    /// Evaluated locally by the math module.
    LocalMath,
    /// Produced by an external provider.
    Provider,
    /// Every provider failed; static apology.
    Fallback,
}

/// Per-message annotations stored alongside the content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ReplySource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Represents a single message within a chat session.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Autoincrement id; breaks ties between equal timestamps.
    pub id: i64,
    /// The ID of the session this message belongs to.
    pub session_id: String,
    /// "user", "assistant" or "system".
    pub role: String,
    pub content: String,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
    pub metadata: Json<MessageMetadata>,
}

impl Message {
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// Wire schema spoken by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// `POST {base}/chat/completions` with `choices[0].message.content`.
    OpenAiCompatible,
    /// Cohere v1 `POST {base}/chat` with a `text` reply.
    Cohere,
}

/// Static configuration for one external provider. Not mutated at runtime.
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    pub name: String,
    pub kind: ProviderKind,
    /// Base URL without a trailing slash.
    pub endpoint: String,
    pub api_key: String,
    /// Model for everyday conversation.
    pub general_model: String,
    /// Model for complex, code or reasoning-heavy questions.
    pub reasoning_model: String,
    /// Position in the failover order, 0 = tried first.
    pub priority: usize,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("general_model", &self.general_model)
            .field("reasoning_model", &self.reasoning_model)
            .field("priority", &self.priority)
            .finish()
    }
}

// --- HTTP payloads ---

/// Inbound body of `POST /api/chat/`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatRequest {
    /// May be blank; blank input gets a canned prompt to say something.
    #[validate(length(max = 5000))]
    pub message: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub session_id: Option<String>,
}

/// A stored message as exposed over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: i64,
    pub message_type: String,
    pub content: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub metadata: MessageMetadata,
}

impl From<Message> for MessageView {
    fn from(message: Message) -> Self {
        let timestamp = chrono::DateTime::from_timestamp_millis(message.created_at)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        Self {
            id: message.id,
            message_type: message.role,
            content: message.content,
            timestamp,
            metadata: message.metadata.0,
        }
    }
}

/// Outbound body of `POST /api/chat/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub user_message: MessageView,
    pub bot_response: MessageView,
}

/// Outbound body of `GET /api/sessions/{id}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetail {
    pub session_id: String,
    pub title: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub message_count: usize,
    pub messages: Vec<MessageView>,
}
