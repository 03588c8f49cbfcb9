//! Provider failure taxonomy.
//!
//! Every kind is non-fatal: the router logs it and advances to the next
//! provider. The distinction exists for logs and tests only.

use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 401 / 403: bad or revoked credential
    Authentication,
    /// 429 / 402: rate limit or exhausted quota
    RateLimited,
    /// No reply within the per-call bound
    Timeout,
    /// Reply arrived but could not be read as a completion
    Malformed,
    /// Any other non-success status
    Upstream(u16),
    /// Connection, DNS or TLS failure
    Transport,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Authentication => write!(f, "authentication"),
            FailureKind::RateLimited => write!(f, "rate_limited"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Malformed => write!(f, "malformed_response"),
            FailureKind::Upstream(code) => write!(f, "upstream_{}", code),
            FailureKind::Transport => write!(f, "transport"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind}: {detail}")]
pub struct ProviderFailure {
    pub kind: FailureKind,
    pub detail: String,
}

/// Upstream error bodies are truncated before they reach logs.
const MAX_DETAIL_CHARS: usize = 200;

impl ProviderFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Malformed, detail)
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::new(
            FailureKind::Timeout,
            format!("no reply within {}s", after.as_secs_f32()),
        )
    }

    /// Classifies a non-success HTTP status.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let kind = match status.as_u16() {
            401 | 403 => FailureKind::Authentication,
            402 | 429 => FailureKind::RateLimited,
            408 | 504 => FailureKind::Timeout,
            code => FailureKind::Upstream(code),
        };
        let detail: String = body.chars().take(MAX_DETAIL_CHARS).collect();
        Self::new(kind, format!("status {}: {}", status, detail))
    }
}

impl From<reqwest::Error> for ProviderFailure {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            FailureKind::Timeout
        } else if err.is_decode() {
            FailureKind::Malformed
        } else if let Some(status) = err.status() {
            return Self::from_status(status, &err.to_string());
        } else {
            FailureKind::Transport
        };
        Self::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            ProviderFailure::from_status(StatusCode::UNAUTHORIZED, "").kind,
            FailureKind::Authentication
        );
        assert_eq!(
            ProviderFailure::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down").kind,
            FailureKind::RateLimited
        );
        assert_eq!(
            ProviderFailure::from_status(StatusCode::PAYMENT_REQUIRED, "quota").kind,
            FailureKind::RateLimited
        );
        assert_eq!(
            ProviderFailure::from_status(StatusCode::BAD_GATEWAY, "").kind,
            FailureKind::Upstream(502)
        );
    }

    #[test]
    fn test_detail_is_truncated() {
        let body = "x".repeat(1000);
        let failure = ProviderFailure::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        assert!(failure.detail.len() < 300);
    }
}
