use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Idle clients are swept once the map grows past this many keys.
const SWEEP_THRESHOLD: usize = 1024;

/// Per-client sliding-window limiter for the chat endpoint.
///
/// Keys are whatever identifies the caller: forwarded client address,
/// session id, or a shared "anonymous" bucket.
pub struct RateLimiter {
    requests: HashMap<String, Vec<Instant>>,
    /// Requests allowed per window; 0 disables limiting.
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        RateLimiter {
            requests: HashMap::new(),
            limit,
            window,
        }
    }

    pub fn per_minute(limit: usize) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    pub fn is_enabled(&self) -> bool {
        self.limit > 0
    }

    /// Records a request from `client` and reports whether it is allowed.
    /// Rejected requests are not recorded.
    pub fn check(&mut self, client: &str) -> bool {
        if !self.is_enabled() {
            return true;
        }

        let now = Instant::now();
        let window = self.window;

        if self.requests.len() > SWEEP_THRESHOLD {
            self.requests
                .retain(|_, stamps| stamps.last().is_some_and(|t| now.duration_since(*t) < window));
        }

        let stamps = self.requests.entry(client.to_string()).or_default();
        stamps.retain(|t| now.duration_since(*t) < window);

        if stamps.len() < self.limit {
            stamps.push(now);
            true
        } else {
            false
        }
    }

    /// Number of tracked clients.
    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }
}
