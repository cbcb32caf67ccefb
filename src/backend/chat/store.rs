/**
 * Message Store
 *
 * This module defines the `MessageStore` trait every storage backend
 * implements, the validated `NewMessage` input it accepts, and the default
 * in-memory implementation.
 *
 * # Eviction
 *
 * A conversation is destroyed as a whole once its newest message is older
 * than the retention window. There is no background timer: every store
 * access first checks staleness, and the check and the access happen
 * atomically (under one write lock here, in one transaction for SQLite).
 * An append that lands right after an eviction therefore starts a fresh
 * conversation instead of writing into a half-destroyed one.
 *
 * # Ids
 *
 * Ids come from a single counter that survives evictions, so a client whose
 * cursor predates an eviction still sees every later message.
 */
use crate::backend::chat::clock::Clock;
use crate::backend::chat::sanitize::{sanitize_field, MAX_BODY_LENGTH, MAX_USERNAME_LENGTH};
use crate::backend::chat::state::ChatState;
use crate::shared::{Cursor, Message, MessageId, SharedError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Default retention window: 24 hours
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(86_400);

/// Identifier of a conversation
///
/// The HTTP surface only ever uses [`ConversationId::global`]; the store is
/// keyed by id so nothing below the handlers depends on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The single conversation exposed over HTTP
    pub fn global() -> Self {
        Self::new("global")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sanitized, validated input for [`MessageStore::append`]
///
/// The only constructor sanitizes both fields, so a store never sees raw
/// user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    username: String,
    body: String,
}

impl NewMessage {
    /// Sanitize and validate raw publish input
    ///
    /// # Errors
    ///
    /// `SharedError::ValidationError` if either field is empty after
    /// stripping markup, or longer than its limit.
    pub fn new(username: &str, body: &str) -> Result<Self, SharedError> {
        Ok(Self {
            username: sanitize_field("username", username, MAX_USERNAME_LENGTH)?,
            body: sanitize_field("body", body, MAX_BODY_LENGTH)?,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Turn into a stored record
    pub fn into_message(self, id: MessageId, created_at: i64) -> Message {
        Message::new(id, self.username, self.body, created_at)
    }
}

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be reached or failed the query
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A store call did not finish within the time it was given
    #[error("store did not respond within {0:?}")]
    TimedOut(Duration),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Append-only, per-conversation message storage with lazy eviction
///
/// Every method runs the staleness check for `conversation` before doing
/// its own work.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message, stamping its id and creation time
    async fn append(
        &self,
        conversation: &ConversationId,
        message: NewMessage,
    ) -> Result<Message, StoreError>;

    /// Messages strictly after `cursor`, in arrival order
    async fn list_since(
        &self,
        conversation: &ConversationId,
        cursor: Cursor,
    ) -> Result<Vec<Message>, StoreError>;

    /// Number of messages strictly after `cursor`
    async fn count_since(
        &self,
        conversation: &ConversationId,
        cursor: Cursor,
    ) -> Result<usize, StoreError>;

    /// Most recent message, if any
    async fn newest(&self, conversation: &ConversationId) -> Result<Option<Message>, StoreError>;

    /// Destroy the conversation if its newest message is past retention
    ///
    /// Returns whether anything was evicted. Idempotent.
    async fn evict_if_stale(&self, conversation: &ConversationId) -> Result<bool, StoreError>;

    /// Destroy the conversation unconditionally
    async fn clear(&self, conversation: &ConversationId) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Conversations {
    by_id: HashMap<ConversationId, ChatState>,
    last_id: u64,
}

impl Conversations {
    fn evict_if_stale(&mut self, conversation: &ConversationId, now: i64, retention: i64) -> bool {
        let stale = self
            .by_id
            .get(conversation)
            .map_or(false, |state| state.is_stale(now, retention));
        if stale {
            self.by_id.remove(conversation);
            tracing::info!("[Store] Evicted stale conversation {}", conversation);
        }
        stale
    }
}

/// In-memory store, the default when no database is configured
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Conversations>,
    retention_secs: i64,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(retention: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Conversations::default()),
            retention_secs: i64::try_from(retention.as_secs()).unwrap_or(i64::MAX),
            clock,
        }
    }

    /// Run `read` against the conversation, evicting it first if stale
    ///
    /// The common case takes only the read lock. A stale conversation is
    /// evicted under the write lock and `read` then sees it as empty.
    async fn with_fresh<T>(
        &self,
        conversation: &ConversationId,
        read: impl Fn(Option<&ChatState>) -> T,
    ) -> T {
        let now = self.clock.now();
        {
            let inner = self.inner.read().await;
            let state = inner.by_id.get(conversation);
            if !state.map_or(false, |s| s.is_stale(now, self.retention_secs)) {
                return read(state);
            }
        }

        let mut inner = self.inner.write().await;
        inner.evict_if_stale(conversation, now, self.retention_secs);
        read(inner.by_id.get(conversation))
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append(
        &self,
        conversation: &ConversationId,
        message: NewMessage,
    ) -> Result<Message, StoreError> {
        let now = self.clock.now();
        let mut inner = self.inner.write().await;
        inner.evict_if_stale(conversation, now, self.retention_secs);

        inner.last_id += 1;
        let id = MessageId(inner.last_id);
        let state = inner.by_id.entry(conversation.clone()).or_default();
        // Timestamps never go backwards even if the wall clock does.
        let created_at = state.newest().map_or(now, |last| last.created_at.max(now));
        let message = message.into_message(id, created_at);
        state.push(message.clone());
        Ok(message)
    }

    async fn list_since(
        &self,
        conversation: &ConversationId,
        cursor: Cursor,
    ) -> Result<Vec<Message>, StoreError> {
        Ok(self
            .with_fresh(conversation, |state| {
                state.map(|s| s.messages_since(cursor)).unwrap_or_default()
            })
            .await)
    }

    async fn count_since(
        &self,
        conversation: &ConversationId,
        cursor: Cursor,
    ) -> Result<usize, StoreError> {
        Ok(self
            .with_fresh(conversation, |state| state.map_or(0, |s| s.count_since(cursor)))
            .await)
    }

    async fn newest(&self, conversation: &ConversationId) -> Result<Option<Message>, StoreError> {
        Ok(self
            .with_fresh(conversation, |state| state.and_then(|s| s.newest().cloned()))
            .await)
    }

    async fn evict_if_stale(&self, conversation: &ConversationId) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let mut inner = self.inner.write().await;
        Ok(inner.evict_if_stale(conversation, now, self.retention_secs))
    }

    async fn clear(&self, conversation: &ConversationId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.by_id.remove(conversation);
        Ok(())
    }
}
