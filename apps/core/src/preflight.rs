//! Readiness checks behind `GET /health/ready`.
//!
//! The database must answer a round-trip. Having no providers configured is
//! reported but does not fail readiness: canned replies, math and commands
//! still work and routed messages get the static fallback.

use crate::database;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

const DATABASE_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub ready: bool,
    pub checks: Vec<CheckResult>,
    pub providers: Vec<String>,
}

pub async fn run_readiness_checks(pool: &SqlitePool, providers: Vec<String>) -> ReadinessReport {
    let checks = vec![check_database(pool).await, check_providers(&providers)];

    let ready = checks
        .iter()
        .filter(|c| is_critical_check(&c.name))
        .all(|c| c.passed);

    if ready {
        info!(providers = providers.len(), "Readiness checks passed");
    } else {
        warn!("Readiness checks failed");
    }

    ReadinessReport {
        ready,
        checks,
        providers,
    }
}

fn is_critical_check(name: &str) -> bool {
    matches!(name, "database")
}

async fn check_database(pool: &SqlitePool) -> CheckResult {
    match timeout(DATABASE_CHECK_TIMEOUT, database::ping(pool)).await {
        Ok(Ok(())) => CheckResult::pass("database", "Database reachable"),
        Ok(Err(e)) => CheckResult::fail("database", "Database query failed", Some(e.to_string())),
        Err(_) => CheckResult::fail("database", "Database did not answer in time", None),
    }
}

fn check_providers(providers: &[String]) -> CheckResult {
    if providers.is_empty() {
        CheckResult::fail(
            "providers",
            "No providers configured; routed messages will get the fallback reply",
            None,
        )
    } else {
        CheckResult::pass(
            "providers",
            &format!("{} provider(s): {}", providers.len(), providers.join(", ")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_check_reports_but_is_not_critical() {
        let check = check_providers(&[]);
        assert!(!check.passed);
        assert!(!is_critical_check(&check.name));

        let check = check_providers(&["groq".to_string()]);
        assert!(check.passed);
        assert!(check.message.contains("groq"));
    }

    #[tokio::test]
    async fn test_zero_providers_is_still_ready() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();

        let report = run_readiness_checks(&pool, vec![]).await;
        assert!(report.ready);
        assert!(report.providers.is_empty());
        assert!(report.checks.iter().any(|c| c.name == "providers" && !c.passed));
    }

    #[tokio::test]
    async fn test_closed_pool_is_not_ready() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        pool.close().await;

        let report = run_readiness_checks(&pool, vec![]).await;
        assert!(!report.ready);
    }
}
