//! Clear handler: `POST /messages/clear` drops the conversation at once.

use crate::backend::chat::feed::ChatService;
use crate::backend::chat::store::ConversationId;
use crate::backend::error::BackendError;
use axum::{extract::State, http::StatusCode};

/// Handle `POST /messages/clear`
pub async fn handle_clear(State(chat): State<ChatService>) -> Result<StatusCode, BackendError> {
    chat.clear(&ConversationId::global()).await?;
    Ok(StatusCode::OK)
}
