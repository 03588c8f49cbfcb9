//! Provider Router Tests
//!
//! Ordered failover: first success wins, every failure advances, nothing
//! is retried and nothing carries over between requests.

use super::fixtures::{count, Behavior, MockProvider};
use crate::providers::{ChatProvider, CompletionRequest, FailureKind, ProviderRouter, RouteOutcome};
use std::sync::Arc;
use std::time::Duration;

fn request() -> CompletionRequest {
    CompletionRequest {
        system_prompt: "You are Clang.".to_string(),
        history: vec![],
        message: "Tell me about Rome".to_string(),
        use_reasoning_model: false,
    }
}

fn router_of(providers: Vec<MockProvider>) -> ProviderRouter {
    let providers: Vec<Arc<dyn ChatProvider>> = providers
        .into_iter()
        .map(|p| Arc::new(p) as Arc<dyn ChatProvider>)
        .collect();
    ProviderRouter::new(providers, Duration::from_millis(100))
}

#[tokio::test]
async fn test_first_success_wins() {
    // 1. Arrange
    let first = MockProvider::replying("openrouter", "Rome was founded in 753 BC.");
    let second = MockProvider::replying("cohere", "unused");
    let (first_calls, second_calls) = (first.calls(), second.calls());
    let router = router_of(vec![first, second]);

    // 2. Act
    let outcome = router.route(&request()).await;

    // 3. Assert
    match outcome {
        RouteOutcome::Delivered {
            provider,
            content,
            failures,
        } => {
            assert_eq!(provider, "openrouter");
            assert_eq!(content, "Rome was founded in 753 BC.");
            assert!(failures.is_empty());
        }
        other => panic!("Expected delivery, got {:?}", other),
    }
    assert_eq!(count(&first_calls), 1);
    assert_eq!(count(&second_calls), 0);
}

#[tokio::test]
async fn test_failures_advance_and_later_providers_are_untouched() {
    // Providers 1..2 fail, 3 succeeds, 4..5 must never be called.
    let providers = vec![
        MockProvider::failing("openrouter", FailureKind::RateLimited),
        MockProvider::failing("cohere", FailureKind::Authentication),
        MockProvider::replying("groq", "from groq"),
        MockProvider::replying("mistral", "from mistral"),
        MockProvider::replying("together", "from together"),
    ];
    let calls: Vec<_> = providers.iter().map(|p| p.calls()).collect();
    let router = router_of(providers);

    let outcome = router.route(&request()).await;

    match outcome {
        RouteOutcome::Delivered {
            provider,
            content,
            failures,
        } => {
            assert_eq!(provider, "groq");
            assert_eq!(content, "from groq");
            let kinds: Vec<_> = failures.iter().map(|f| f.failure.kind).collect();
            assert_eq!(kinds, vec![FailureKind::RateLimited, FailureKind::Authentication]);
            assert_eq!(failures[0].provider, "openrouter");
        }
        other => panic!("Expected delivery, got {:?}", other),
    }

    let counts: Vec<usize> = calls.iter().map(count).collect();
    assert_eq!(counts, vec![1, 1, 1, 0, 0]);
}

#[tokio::test]
async fn test_all_failures_exhaust_without_retry() {
    let providers = vec![
        MockProvider::failing("openrouter", FailureKind::Malformed),
        MockProvider::failing("cohere", FailureKind::Upstream(503)),
        MockProvider::failing("groq", FailureKind::Transport),
    ];
    let calls: Vec<_> = providers.iter().map(|p| p.calls()).collect();
    let router = router_of(providers);

    let outcome = router.route(&request()).await;

    match outcome {
        RouteOutcome::Exhausted { failures } => assert_eq!(failures.len(), 3),
        other => panic!("Expected exhaustion, got {:?}", other),
    }
    assert!(calls.iter().all(|c| count(c) == 1));
}

#[tokio::test]
async fn test_timeout_advances_to_next_provider() {
    let slow = MockProvider::new("openrouter", Behavior::Hang);
    let fast = MockProvider::replying("cohere", "quick answer");
    let router = router_of(vec![slow, fast]);

    let started = std::time::Instant::now();
    let outcome = router.route(&request()).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    match outcome {
        RouteOutcome::Delivered {
            provider, failures, ..
        } => {
            assert_eq!(provider, "cohere");
            assert_eq!(failures[0].failure.kind, FailureKind::Timeout);
        }
        other => panic!("Expected delivery, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_providers_is_exhausted() {
    let router = router_of(vec![]);

    match router.route(&request()).await {
        RouteOutcome::Exhausted { failures } => assert!(failures.is_empty()),
        other => panic!("Expected exhaustion, got {:?}", other),
    }
}

#[tokio::test]
async fn test_each_request_restarts_from_the_top() {
    // A quota failure is not remembered: the next request tries it again.
    let exhausted = MockProvider::failing("openrouter", FailureKind::RateLimited);
    let backup = MockProvider::replying("cohere", "ok");
    let (exhausted_calls, backup_calls) = (exhausted.calls(), backup.calls());
    let router = router_of(vec![exhausted, backup]);

    router.route(&request()).await;
    router.route(&request()).await;

    assert_eq!(count(&exhausted_calls), 2);
    assert_eq!(count(&backup_calls), 2);
}

#[tokio::test]
async fn test_provider_names_follow_priority() {
    let router = router_of(vec![
        MockProvider::replying("groq", "a"),
        MockProvider::replying("mistral", "b"),
    ]);
    assert_eq!(router.provider_names(), vec!["groq", "mistral"]);
}
