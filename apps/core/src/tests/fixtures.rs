//! Shared fixtures: temporary databases and scripted providers.

use crate::providers::{ChatProvider, CompletionRequest, FailureKind, ProviderFailure};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{tempdir, TempDir};

/// Creates a migrated SQLite database in a temp dir. Keep the `TempDir`
/// alive for as long as the pool is used.
pub async fn create_test_pool() -> (SqlitePool, TempDir) {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.sqlite");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .expect("Failed to create test pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    (pool, dir)
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Reply(String),
    Fail(FailureKind),
    /// Never answers; only a router timeout ends the call.
    Hang,
}

/// Provider with a fixed behavior that counts its calls.
pub struct MockProvider {
    name: String,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<CompletionRequest>>>,
}

impl MockProvider {
    pub fn new(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn replying(name: &str, text: &str) -> Self {
        Self::new(name, Behavior::Reply(text.to_string()))
    }

    pub fn failing(name: &str, kind: FailureKind) -> Self {
        Self::new(name, Behavior::Fail(kind))
    }

    /// Handle to the call counter, usable after the provider is moved.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn last_request(&self) -> Arc<Mutex<Option<CompletionRequest>>> {
        self.last_request.clone()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, ProviderFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        match &self.behavior {
            Behavior::Reply(text) => Ok(text.clone()),
            Behavior::Fail(kind) => Err(ProviderFailure::new(*kind, "scripted failure")),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok("too late".to_string())
            }
        }
    }
}

pub fn count(calls: &Arc<AtomicUsize>) -> usize {
    calls.load(Ordering::SeqCst)
}
