//! Conversation log endpoints

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use daybook_domain::{ChatMessage, ChatRole};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct NewMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessageList {
    pub success: bool,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct Recorded {
    pub success: bool,
    pub message: ChatMessage,
}

#[derive(Debug, Serialize)]
pub struct Cleared {
    pub success: bool,
}

pub async fn list_messages(
    State(context): State<AppState>,
    user: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageList>, ApiError> {
    let Path(user_id) = user?;
    let messages = context.conversation.history(&user_id).await?;
    Ok(Json(MessageList { success: true, messages }))
}

pub async fn record_message(
    State(context): State<AppState>,
    user: Result<Path<String>, PathRejection>,
    body: Result<Json<NewMessage>, JsonRejection>,
) -> Result<(StatusCode, Json<Recorded>), ApiError> {
    let Path(user_id) = user?;
    let Json(NewMessage { role, content }) = body?;
    let message = context.conversation.record(&user_id, role, &content).await?;
    Ok((StatusCode::CREATED, Json(Recorded { success: true, message })))
}

/// Drops the chat log and the cached forecast.
pub async fn clear_messages(
    State(context): State<AppState>,
    user: Result<Path<String>, PathRejection>,
) -> Result<Json<Cleared>, ApiError> {
    let Path(user_id) = user?;
    context.conversation.clear(&user_id).await?;
    Ok(Json(Cleared { success: true }))
}
