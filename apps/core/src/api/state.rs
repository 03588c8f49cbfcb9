use crate::assistant::Assistant;
use crate::rate_limiter::RateLimiter;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handler state. Cloned per request; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub limiter: Arc<Mutex<RateLimiter>>,
}

impl AppState {
    pub fn new(assistant: Assistant, limiter: RateLimiter) -> Self {
        Self {
            assistant: Arc::new(assistant),
            limiter: Arc::new(Mutex::new(limiter)),
        }
    }
}
