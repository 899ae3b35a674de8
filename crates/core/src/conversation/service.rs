//! Conversation service - chat transcript and its effect on the forecast

use std::sync::Arc;

use chrono::Utc;
use daybook_domain::{ChatMessage, ChatRole, DaybookError, Result};
use tracing::{info, instrument};

use super::ports::MessageLog;
use crate::forecast::ForecastStore;

#[derive(Clone)]
pub struct ConversationService {
    messages: Arc<dyn MessageLog>,
    forecasts: Arc<dyn ForecastStore>,
}

impl ConversationService {
    pub fn new(messages: Arc<dyn MessageLog>, forecasts: Arc<dyn ForecastStore>) -> Self {
        Self { messages, forecasts }
    }

    pub async fn history(&self, user_id: &str) -> Result<Vec<ChatMessage>> {
        self.messages.load_messages(user_id).await
    }

    /// Append a message. Content is trimmed and must not be empty.
    #[instrument(skip(self, content))]
    pub async fn record(&self, user_id: &str, role: ChatRole, content: &str) -> Result<ChatMessage> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DaybookError::Validation("message content is required".into()));
        }

        let message = ChatMessage { role, content: content.to_string(), timestamp: Some(Utc::now()) };
        self.messages.append_message(user_id, &message).await?;
        Ok(message)
    }

    /// Drop the transcript together with the forecast derived from it.
    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: &str) -> Result<()> {
        self.messages.clear_messages(user_id).await?;
        self.forecasts.delete_forecast(user_id).await?;
        info!(user_id, "conversation cleared");
        Ok(())
    }
}
