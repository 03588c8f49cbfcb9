//! Chat request pipeline: intake, classification, local answers or
//! provider routing, formatting and persistence.

use crate::brain::{
    math, ComplexityAssessment, ComplexityLevel, ComplexityScorer, IntentClassifier, IntentTag,
};
use crate::config::AppConfig;
use crate::database;
use crate::error::AppError;
use crate::models::{ChatRequest, ChatResponse, Message, MessageMetadata, ReplySource, Role};
use crate::providers::{ChatTurn, CompletionRequest, ProviderRouter, RouteOutcome};
use crate::response::{CannedReplies, ResponseFormatter};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Session titles are cut to this many characters.
const TITLE_MAX_CHARS: usize = 50;

/// Tunables for the pipeline, normally taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub assistant_name: String,
    pub history_turns: usize,
    pub essay_target_words: usize,
}

impl From<&AppConfig> for AssistantSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            assistant_name: config.assistant_name.clone(),
            history_turns: config.history_turns,
            essay_target_words: config.essay_target_words,
        }
    }
}

/// A reply before it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: String,
    pub metadata: MessageMetadata,
}

impl Reply {
    fn new(content: String, intent: IntentTag, source: ReplySource) -> Self {
        Self {
            content,
            metadata: MessageMetadata {
                intent: Some(intent),
                source: Some(source),
                provider: None,
            },
        }
    }
}

pub struct Assistant {
    pool: SqlitePool,
    router: ProviderRouter,
    classifier: IntentClassifier,
    scorer: ComplexityScorer,
    formatter: ResponseFormatter,
    canned: CannedReplies,
    settings: AssistantSettings,
}

impl Assistant {
    pub fn new(pool: SqlitePool, router: ProviderRouter, settings: AssistantSettings) -> Self {
        Self {
            pool,
            router,
            classifier: IntentClassifier::new(),
            scorer: ComplexityScorer::new(),
            formatter: ResponseFormatter::new(settings.essay_target_words),
            canned: CannedReplies::new(settings.assistant_name.clone()),
            settings,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn router(&self) -> &ProviderRouter {
        &self.router
    }

    /// Handles one inbound chat message end to end.
    #[instrument(skip(self, request), fields(session_id))]
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        request.validate()?;

        let session_id = match request.session_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        tracing::Span::current().record("session_id", session_id.as_str());

        database::ensure_session(&self.pool, &session_id, &session_title(&request.message)).await?;

        // History is read before the new message is stored so it is not sent twice.
        let history =
            database::recent_messages(&self.pool, &session_id, self.settings.history_turns).await?;

        let user_message = database::add_message(
            &self.pool,
            &session_id,
            Role::User,
            &request.message,
            MessageMetadata::default(),
        )
        .await?;

        let reply = self.respond(&request.message, &history).await;
        info!(
            intent = ?reply.metadata.intent,
            source = ?reply.metadata.source,
            provider = reply.metadata.provider.as_deref().unwrap_or("-"),
            "Reply ready"
        );

        let bot_message = database::add_message(
            &self.pool,
            &session_id,
            Role::Assistant,
            &reply.content,
            reply.metadata,
        )
        .await?;

        Ok(ChatResponse {
            session_id,
            user_message: user_message.into(),
            bot_response: bot_message.into(),
        })
    }

    /// Produces a reply for `message`. Never fails: provider exhaustion
    /// becomes the static fallback.
    pub async fn respond(&self, message: &str, history: &[Message]) -> Reply {
        let text = message.trim();

        if text.is_empty() {
            return Reply::new(self.canned.empty_input(), IntentTag::General, ReplySource::Canned);
        }

        if text.starts_with('/') {
            return Reply::new(self.run_command(text), IntentTag::General, ReplySource::Command);
        }

        let classification = self.classifier.classify(text);
        let tag = classification.tag;
        debug!(%tag, matched = ?classification.matched, "Message classified");

        match tag {
            IntentTag::Greeting => {
                return Reply::new(self.canned.greeting(), tag, ReplySource::Canned);
            }
            IntentTag::Identity => {
                return Reply::new(self.canned.identity(), tag, ReplySource::Canned);
            }
            IntentTag::Math => {
                if let Some(answer) = math::answer(text) {
                    return Reply::new(answer, tag, ReplySource::LocalMath);
                }
            }
            _ => {}
        }

        let assessment = self.scorer.assess(text);
        let request = CompletionRequest {
            system_prompt: self.system_prompt(tag, &assessment),
            history: to_turns(history),
            message: text.to_string(),
            use_reasoning_model: assessment.use_reasoning_model || tag == IntentTag::Math,
        };

        match self.router.route(&request).await {
            RouteOutcome::Delivered {
                provider, content, ..
            } => {
                let mut reply = Reply::new(
                    self.formatter.format(tag, &content, text),
                    tag,
                    ReplySource::Provider,
                );
                reply.metadata.provider = Some(provider);
                reply
            }
            RouteOutcome::Exhausted { failures } => {
                let tried: Vec<String> = failures
                    .iter()
                    .map(|f| format!("{} ({})", f.provider, f.failure.kind))
                    .collect();
                debug!(?tried, "Answering with the fallback reply");
                Reply::new(self.canned.fallback(), tag, ReplySource::Fallback)
            }
        }
    }

    fn run_command(&self, input: &str) -> String {
        let command = input.split_whitespace().next().unwrap_or(input).to_lowercase();
        match command.as_str() {
            "/help" | "/commands" => self.canned.help(),
            "/status" => self.canned.status(&self.router.provider_names()),
            _ => self.canned.unknown_command(&command),
        }
    }

    fn system_prompt(&self, tag: IntentTag, assessment: &ComplexityAssessment) -> String {
        let name = self.canned.name();
        let mut prompt = match assessment.level {
            ComplexityLevel::Simple => format!(
                "You are {}, a friendly AI assistant. Answer briefly and clearly.",
                name
            ),
            ComplexityLevel::Medium => format!(
                "You are {}, a knowledgeable AI assistant. Give a clear, well-organized answer.",
                name
            ),
            ComplexityLevel::Complex => format!(
                "You are {}, an expert AI assistant. Think through the problem step by step \
                 and explain your reasoning before giving the final answer.",
                name
            ),
        };

        let hint = match tag {
            IntentTag::Medical => Some(
                "Provide general health information only, never a diagnosis, and encourage \
                 the user to consult a healthcare professional."
                    .to_string(),
            ),
            IntentTag::Essay => Some(format!(
                "Write a well-structured essay of about {} words with an introduction, \
                 body paragraphs and a conclusion, separated by blank lines.",
                self.settings.essay_target_words
            )),
            IntentTag::Emotional => Some(
                "The user is sharing how they feel. Respond with empathy and warmth."
                    .to_string(),
            ),
            IntentTag::Math => {
                Some("Show the working and state the final result clearly.".to_string())
            }
            _ => None,
        };

        if let Some(hint) = hint {
            prompt.push(' ');
            prompt.push_str(&hint);
        }
        prompt
    }
}

fn to_turns(history: &[Message]) -> Vec<ChatTurn> {
    history
        .iter()
        .filter_map(|message| match message.role() {
            Some(role @ (Role::User | Role::Assistant)) => Some(ChatTurn {
                role,
                content: message.content.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// First user message, trimmed and cut to [`TITLE_MAX_CHARS`] characters.
pub fn session_title(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(TITLE_MAX_CHARS - 3).collect();
    format!("{}...", cut.trim_end())
}
