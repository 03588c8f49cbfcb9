//! Database Module Tests
//!
//! Sessions, append-only message history and ordering.

use super::fixtures::create_test_pool;
use crate::brain::IntentTag;
use crate::database;
use crate::models::{MessageMetadata, ReplySource, Role};

#[cfg(test)]
mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_session_creates_once() {
        let (pool, _dir) = create_test_pool().await;

        let created = database::ensure_session(&pool, "s-1", "First title")
            .await
            .expect("Failed to create session");
        assert_eq!(created.id, "s-1");
        assert_eq!(created.title, "First title");

        let again = database::ensure_session(&pool, "s-1", "Other title")
            .await
            .expect("Failed to fetch session");
        assert_eq!(again.title, "First title");
        assert_eq!(again.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_get_missing_session() {
        let (pool, _dir) = create_test_pool().await;

        let missing = database::get_session(&pool, "nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_sessions_by_activity_with_counts() {
        let (pool, _dir) = create_test_pool().await;

        database::ensure_session(&pool, "old", "old").await.unwrap();
        database::ensure_session(&pool, "new", "new").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        database::add_message(&pool, "old", Role::User, "bump", MessageMetadata::default())
            .await
            .unwrap();

        let sessions = database::list_sessions(&pool).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, "old");
        assert_eq!(sessions[0].message_count, 1);
        assert_eq!(sessions[1].message_count, 0);
    }

    #[tokio::test]
    async fn test_delete_session_removes_messages() {
        let (pool, _dir) = create_test_pool().await;

        database::ensure_session(&pool, "gone", "").await.unwrap();
        database::add_message(&pool, "gone", Role::User, "hi", MessageMetadata::default())
            .await
            .unwrap();

        assert!(database::delete_session(&pool, "gone").await.unwrap());
        assert!(database::get_session(&pool, "gone").await.unwrap().is_none());
        assert!(database::get_session_messages(&pool, "gone").await.unwrap().is_empty());

        assert!(!database::delete_session(&pool, "gone").await.unwrap());
    }
}

#[cfg(test)]
mod message_tests {
    use super::*;

    #[tokio::test]
    async fn test_same_message_twice_yields_two_records_in_order() {
        let (pool, _dir) = create_test_pool().await;
        database::ensure_session(&pool, "s", "").await.unwrap();

        let first =
            database::add_message(&pool, "s", Role::User, "ping", MessageMetadata::default())
            .await
            .unwrap();
        let second =
            database::add_message(&pool, "s", Role::User, "ping", MessageMetadata::default())
            .await
            .unwrap();

        assert_ne!(first.id, second.id);

        let history = database::get_session_messages(&pool, "s").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, first.id);
        assert_eq!(history[1].id, second.id);
        assert!(history[0].created_at <= history[1].created_at);
    }

    #[tokio::test]
    async fn test_recent_messages_returns_tail_oldest_first() {
        let (pool, _dir) = create_test_pool().await;
        database::ensure_session(&pool, "s", "").await.unwrap();

        for i in 0..5 {
            let content = format!("m{}", i);
            database::add_message(&pool, "s", Role::User, &content, MessageMetadata::default())
                .await
                .unwrap();
        }

        let recent = database::recent_messages(&pool, "s", 3).await.unwrap();
        let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn test_metadata_round_trip() {
        let (pool, _dir) = create_test_pool().await;
        database::ensure_session(&pool, "s", "").await.unwrap();

        let metadata = MessageMetadata {
            intent: Some(IntentTag::Medical),
            source: Some(ReplySource::Provider),
            provider: Some("groq".to_string()),
        };
        database::add_message(&pool, "s", Role::Assistant, "answer", metadata.clone())
            .await
            .unwrap();

        let stored = database::get_session_messages(&pool, "s").await.unwrap();
        assert_eq!(stored[0].metadata.0, metadata);
        assert_eq!(stored[0].role(), Some(Role::Assistant));
    }

    #[tokio::test]
    async fn test_messages_are_scoped_to_their_session() {
        let (pool, _dir) = create_test_pool().await;
        database::ensure_session(&pool, "a", "").await.unwrap();
        database::ensure_session(&pool, "b", "").await.unwrap();

        database::add_message(&pool, "a", Role::User, "for a", MessageMetadata::default())
            .await
            .unwrap();

        assert_eq!(database::get_session_messages(&pool, "a").await.unwrap().len(), 1);
        assert!(database::get_session_messages(&pool, "b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_message_requires_existing_session() {
        let (pool, _dir) = create_test_pool().await;

        let result =
            database::add_message(&pool, "ghost", Role::User, "hi", MessageMetadata::default())
                .await;
        assert!(result.is_err());
    }
}
