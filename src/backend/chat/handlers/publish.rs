/**
 * Publish Handler
 *
 * `POST /messages` with a form-encoded `username` and `body` (the field is
 * also accepted as `message`). Input is untrusted: markup is stripped and
 * lengths are checked before anything is stored.
 */

use crate::backend::chat::feed::ChatService;
use crate::backend::chat::store::ConversationId;
use crate::backend::error::BackendError;
use axum::{extract::State, http::StatusCode, Form};
use serde::Deserialize;

/// Form fields of the publish endpoint
///
/// Both fields are optional at the extractor level so a missing field is
/// reported as a validation error naming it, not as a form rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PublishForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "message")]
    pub body: Option<String>,
}

/// Handle `POST /messages`
///
/// # Errors
///
/// * `400 Bad Request` - username or body empty after sanitization, or too long
/// * `503 Service Unavailable` - the store failed
pub async fn handle_publish(
    State(chat): State<ChatService>,
    Form(form): Form<PublishForm>,
) -> Result<StatusCode, BackendError> {
    chat.publish(
        &ConversationId::global(),
        form.username.as_deref().unwrap_or_default(),
        form.body.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(StatusCode::OK)
}
