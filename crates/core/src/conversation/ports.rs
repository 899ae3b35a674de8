//! Port interface for the per-user chat transcript

use async_trait::async_trait;
use daybook_domain::{ChatMessage, Result};

/// Append-only message log, read back in chronological order
#[async_trait]
pub trait MessageLog: Send + Sync {
    async fn load_messages(&self, user_id: &str) -> Result<Vec<ChatMessage>>;

    async fn append_message(&self, user_id: &str, message: &ChatMessage) -> Result<()>;

    async fn clear_messages(&self, user_id: &str) -> Result<()>;
}
