//! Sequential provider failover.
//!
//! Providers are tried strictly in priority order, one at a time, each
//! bounded by the same timeout. The first success wins; every failure kind
//! advances to the next provider. No provider is retried within a request
//! and nothing is remembered between requests.

use super::{ChatProvider, CompletionRequest, ProviderFailure};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, instrument, warn};

/// A provider that was tried and failed.
#[derive(Debug, Clone)]
pub struct FailedAttempt {
    pub provider: String,
    pub failure: ProviderFailure,
}

#[derive(Debug, Clone)]
pub enum RouteOutcome {
    Delivered {
        provider: String,
        content: String,
        /// Providers that failed before this one, in order.
        failures: Vec<FailedAttempt>,
    },
    /// Every provider failed, or none is configured.
    Exhausted { failures: Vec<FailedAttempt> },
}

pub struct ProviderRouter {
    providers: Vec<Arc<dyn ChatProvider>>,
    call_timeout: Duration,
}

impl ProviderRouter {
    pub fn new(providers: Vec<Arc<dyn ChatProvider>>, call_timeout: Duration) -> Self {
        Self {
            providers,
            call_timeout,
        }
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    #[instrument(skip_all, fields(providers = self.providers.len()))]
    pub async fn route(&self, request: &CompletionRequest) -> RouteOutcome {
        let mut failures = Vec::new();

        for provider in &self.providers {
            let name = provider.name().to_string();

            let failure = match timeout(self.call_timeout, provider.send(request)).await {
                Ok(Ok(content)) => {
                    info!(provider = %name, failed_before = failures.len(), "Provider answered");
                    return RouteOutcome::Delivered {
                        provider: name,
                        content,
                        failures,
                    };
                }
                Ok(Err(failure)) => failure,
                Err(_) => ProviderFailure::timeout(self.call_timeout),
            };

            warn!(
                provider = %name,
                kind = %failure.kind,
                detail = %failure.detail,
                "Provider failed, advancing to next"
            );
            failures.push(FailedAttempt {
                provider: name,
                failure,
            });
        }

        error!(attempted = failures.len(), "All providers failed");
        RouteOutcome::Exhausted { failures }
    }
}
