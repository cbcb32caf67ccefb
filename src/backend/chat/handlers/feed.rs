/**
 * Long-Poll Feed Handler
 *
 * `GET /messages?cursor=<id>` holds the request open until there is
 * something after the cursor or the wait budget runs out. Both outcomes are
 * a 200; an empty `messages` array with the cursor unchanged means "nothing
 * new, ask again".
 *
 * The older `last=<id>` parameter name is accepted as well.
 */

use crate::backend::chat::feed::ChatService;
use crate::backend::chat::store::ConversationId;
use crate::backend::error::BackendError;
use crate::shared::{Cursor, FeedResponse};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

/// Query parameters of the feed endpoint
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Position of the last message the client has seen
    #[serde(default, alias = "last")]
    pub cursor: Option<String>,
}

impl FeedQuery {
    /// The requested cursor; anything unparseable reads from the beginning
    pub fn cursor(&self) -> Cursor {
        self.cursor
            .as_deref()
            .map_or(Cursor::ORIGIN, Cursor::parse_lenient)
    }
}

/// Handle `GET /messages`
///
/// # Errors
///
/// * `503 Service Unavailable` - the store failed or did not answer in time
pub async fn handle_feed(
    State(chat): State<ChatService>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, BackendError> {
    let cursor = query.cursor();
    tracing::debug!("[Feed] Poll from cursor {}", cursor);

    let batch = chat.feed(&ConversationId::global(), cursor).await?;

    Ok(Json(FeedResponse {
        messages: batch.messages,
        cursor: batch.cursor,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cursor_is_origin() {
        assert!(FeedQuery::default().cursor().is_origin());
    }

    #[test]
    fn test_malformed_cursor_is_origin() {
        let query = FeedQuery {
            cursor: Some("not-a-number".to_string()),
        };
        assert!(query.cursor().is_origin());
    }

    #[test]
    fn test_numeric_cursor() {
        let query = FeedQuery {
            cursor: Some("42".to_string()),
        };
        assert_eq!(query.cursor().value(), 42);
    }
}
