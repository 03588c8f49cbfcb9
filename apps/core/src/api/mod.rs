//! HTTP surface: chat, sessions and health endpoints.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
