use crate::models::{Message, MessageMetadata, Role, Session, SessionSummary};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::error::AppError;

/// Opens (creating if needed) the SQLite database and applies migrations.
pub async fn init_db(database_url: &str) -> Result<SqlitePool, AppError> {
    info!(database_url, "Initializing database");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    if let Some(parent) = Path::new(options.get_filename()).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

/// Cheap round-trip used by readiness checks.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

// --- Sessions ---

/// Returns the session with `id`, creating it with `title` when absent.
/// An existing session keeps its original title.
pub async fn ensure_session(
    pool: &SqlitePool,
    id: &str,
    title: &str,
) -> Result<Session, sqlx::Error> {
    let now = Utc::now().timestamp_millis();

    sqlx::query(
        r#"
        INSERT INTO sessions (id, title, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, Session>(
        r#"
        SELECT id, title, created_at, updated_at
        FROM sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn get_session(pool: &SqlitePool, id: &str) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT id, title, created_at, updated_at
        FROM sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// All sessions, most recently active first.
pub async fn list_sessions(pool: &SqlitePool) -> Result<Vec<SessionSummary>, sqlx::Error> {
    sqlx::query_as::<_, SessionSummary>(
        r#"
        SELECT s.id, s.title, s.created_at, s.updated_at,
               COUNT(m.id) AS message_count
        FROM sessions s
        LEFT JOIN messages m ON m.session_id = s.id
        GROUP BY s.id
        ORDER BY s.updated_at DESC, s.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Removes a session and its messages. Returns `false` when nothing matched.
pub async fn delete_session(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM messages WHERE session_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

// --- Messages ---

/// Appends a message and bumps the session's `updated_at`.
pub async fn add_message(
    pool: &SqlitePool,
    session_id: &str,
    role: Role,
    content: &str,
    metadata: MessageMetadata,
) -> Result<Message, sqlx::Error> {
    let created_at = Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;

    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (session_id, role, content, created_at, metadata)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, session_id, role, content, created_at, metadata
        "#,
    )
    .bind(session_id)
    .bind(role.as_str())
    .bind(content)
    .bind(created_at)
    .bind(Json(metadata))
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE sessions SET updated_at = ? WHERE id = ?")
        .bind(created_at)
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(message)
}

/// Full history in time order.
pub async fn get_session_messages(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, session_id, role, content, created_at, metadata
        FROM messages
        WHERE session_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
}

/// The last `limit` messages of a session, oldest first.
pub async fn recent_messages(
    pool: &SqlitePool,
    session_id: &str,
    limit: usize,
) -> Result<Vec<Message>, sqlx::Error> {
    let mut messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, session_id, role, content, created_at, metadata
        FROM messages
        WHERE session_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(session_id)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    messages.reverse();
    Ok(messages)
}
