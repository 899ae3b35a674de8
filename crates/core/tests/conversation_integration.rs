//! Integration tests for the conversation service

mod support;

use std::sync::Arc;

use chrono::Utc;
use daybook_core::ConversationService;
use daybook_domain::{ChatRole, DaybookError, ForecastRecord};
use support::repositories::InMemoryStore;
use support::scenarios;

const USER: &str = "user-1";

fn conversation(store: &InMemoryStore) -> ConversationService {
    let store = Arc::new(store.clone());
    ConversationService::new(store.clone(), store)
}

#[tokio::test]
async fn test_record_appends_in_order() {
    let store = InMemoryStore::new();
    let service = conversation(&store);

    service.record(USER, ChatRole::User, "  plan my week ").await.unwrap();
    service.record(USER, ChatRole::Assistant, "Sure").await.unwrap();

    let history = service.history(USER).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "plan my week");
    assert_eq!(history[0].role, ChatRole::User);
    assert_eq!(history[1].role, ChatRole::Assistant);
    assert!(history.iter().all(|message| message.timestamp.is_some()));
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let store = InMemoryStore::new();
    let service = conversation(&store);

    let err = service.record(USER, ChatRole::User, "   ").await.unwrap_err();
    assert!(matches!(err, DaybookError::Validation(_)));
    assert!(service.history(USER).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_drops_messages_and_forecast() {
    let store = InMemoryStore::new().with_forecast(
        USER,
        ForecastRecord { data: scenarios("cached"), hash: "ab".repeat(32), timestamp: Utc::now() },
    );
    let service = conversation(&store);
    service.record(USER, ChatRole::User, "hello").await.unwrap();

    service.clear(USER).await.unwrap();

    assert!(service.history(USER).await.unwrap().is_empty());
    assert_eq!(store.forecast(USER), None);
}
