use super::state::AppState;
use crate::database;
use crate::error::AppError;
use crate::models::{ChatRequest, ChatResponse, MessageView, SessionDetail};
use crate::preflight;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn ready(
    State(state): State<AppState>,
) -> (StatusCode, Json<preflight::ReadinessReport>) {
    let report = preflight::run_readiness_checks(
        state.assistant.pool(),
        state.assistant.router().provider_names(),
    )
    .await;

    let status = if report.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

/// Rate-limit key: first forwarded client address, else the session, else a shared bucket.
fn client_key(headers: &HeaderMap, request: &ChatRequest) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(addr) = forwarded {
        return addr.to_string();
    }

    match request.session_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => format!("session:{}", id),
        _ => "anonymous".to_string(),
    }
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let key = client_key(&headers, &request);
    {
        let mut limiter = state.limiter.lock().await;
        if !limiter.check(&key) {
            warn!(
                client = %key,
                tracked_clients = limiter.tracked_clients(),
                "Chat rate limit exceeded"
            );
            return Err(AppError::RateLimited);
        }
    }

    let response = state.assistant.handle(request).await?;
    Ok(Json(response))
}

pub async fn list_sessions(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let sessions = database::list_sessions(state.assistant.pool()).await?;
    Ok(Json(json!({ "sessions": sessions })))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionDetail>, AppError> {
    let pool = state.assistant.pool();
    let session = database::get_session(pool, &session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("session {}", session_id)))?;

    let messages: Vec<MessageView> = database::get_session_messages(pool, &session_id)
        .await?
        .into_iter()
        .map(MessageView::from)
        .collect();

    Ok(Json(SessionDetail {
        session_id: session.id,
        title: session.title,
        created_at: session.created_at,
        updated_at: session.updated_at,
        message_count: messages.len(),
        messages,
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !database::delete_session(state.assistant.pool(), &session_id).await? {
        return Err(AppError::NotFound(format!("session {}", session_id)));
    }
    Ok(Json(json!({ "deleted": true, "session_id": session_id })))
}
