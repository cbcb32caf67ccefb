/**
 * Message Data Structure
 *
 * This module defines the Message record stored by the server and delivered
 * to clients by the long-poll feed, together with the feed response wrapper.
 *
 * The types are shared between server and client, so both sides agree on
 * the JSON shape without a separate schema.
 */
use crate::shared::cursor::Cursor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned message identifier
///
/// Ids are handed out in strictly increasing order and are never reused,
/// so they double as the ordering key of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Raw numeric value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single chat message
///
/// `username` and `body` are already sanitized when a `Message` exists:
/// the store only accepts input that went through markup stripping.
///
/// # Fields
/// * `id` - Store-assigned, monotonically increasing identifier
/// * `username` - Sanitized display name of the sender
/// * `body` - Sanitized message text
/// * `created_at` - Seconds since the Unix epoch
///
/// # Example
/// ```rust
/// use pollchat::shared::{Message, MessageId};
///
/// let message = Message::new(MessageId(1), "alice", "hello", 1_700_000_000);
/// assert_eq!(message.position().value(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Store-assigned identifier
    pub id: MessageId,
    /// Sender name
    pub username: String,
    /// Message text
    pub body: String,
    /// Creation time, seconds since epoch
    pub created_at: i64,
}

impl Message {
    /// Create a message record
    pub fn new(
        id: MessageId,
        username: impl Into<String>,
        body: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            body: body.into(),
            created_at,
        }
    }

    /// Cursor pointing at this message
    ///
    /// A client that has delivered this message resumes from here.
    pub fn position(&self) -> Cursor {
        Cursor::at(self.id)
    }
}

/// Body of a successful feed response
///
/// `cursor` is the position of the last message in `messages`, or the
/// request's cursor unchanged when the call timed out with nothing new.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedResponse {
    /// New messages in arrival order
    pub messages: Vec<Message>,
    /// Where the next request should resume
    pub cursor: Cursor,
}

impl FeedResponse {
    /// Response carrying no messages
    pub fn empty(cursor: Cursor) -> Self {
        Self {
            messages: Vec::new(),
            cursor,
        }
    }
}
