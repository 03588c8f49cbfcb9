use super::handlers;
use super::state::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the application router. Every API path also answers without
/// its trailing slash.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/health/ready", get(handlers::ready))
        .route("/api/chat/", post(handlers::chat))
        .route("/api/chat", post(handlers::chat))
        .route("/api/sessions/", get(handlers::list_sessions))
        .route("/api/sessions", get(handlers::list_sessions))
        .route(
            "/api/sessions/{id}/",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/api/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/api/sessions/{id}/delete/", delete(handlers::delete_session))
        .route("/api/sessions/{id}/delete", delete(handlers::delete_session))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
