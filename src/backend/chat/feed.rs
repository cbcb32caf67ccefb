/**
 * Chat Service: Long-Poll Feed, Publish and Clear
 *
 * `ChatService` ties a [`MessageStore`] to the [`FeedNotifier`] and
 * implements the three chat operations the HTTP handlers expose.
 *
 * # Feed algorithm
 *
 * 1. Subscribe to the conversation's notifier.
 * 2. Read everything after the cursor. If there is anything, return it; the
 *    next cursor is the position of the last message.
 * 3. If the wait budget is spent, return an empty batch with the cursor
 *    unchanged.
 * 4. Otherwise wait for a notification, the recheck interval or the
 *    deadline, whichever comes first, and go back to 2.
 *
 * The read in step 2 is a single "fetch where id > cursor" whose emptiness
 * is used directly. There is no separate existence check that a concurrent
 * publish could slip between.
 *
 * # Deadlines
 *
 * Each store call gets the remaining budget plus a short grace period. A
 * store that hangs longer is reported as unavailable, so a feed call never
 * outlives `wait_budget + store_grace`.
 */

use crate::backend::chat::store::{ConversationId, MessageStore, NewMessage, StoreError};
use crate::backend::error::BackendError;
use crate::backend::realtime::FeedNotifier;
use crate::shared::{Cursor, Message};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default time a feed call waits for new messages
pub const DEFAULT_WAIT_BUDGET: Duration = Duration::from_secs(35);

/// Default interval between safety-net rechecks while waiting
pub const DEFAULT_RECHECK_INTERVAL: Duration = Duration::from_millis(1000);

/// Default extra time a store call may take past the wait budget
pub const DEFAULT_STORE_GRACE: Duration = Duration::from_millis(250);

/// Timing knobs of the long-poll feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    /// How long a feed call waits for new messages before giving up
    pub wait_budget: Duration,
    /// How often a waiting call re-reads the store without being notified.
    /// Covers writers outside this process sharing a database.
    pub recheck_interval: Duration,
    /// Extra time a store call may take past the wait budget
    pub store_grace: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            wait_budget: DEFAULT_WAIT_BUDGET,
            recheck_interval: DEFAULT_RECHECK_INTERVAL,
            store_grace: DEFAULT_STORE_GRACE,
        }
    }
}

/// Result of one feed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedBatch {
    /// New messages in arrival order
    pub messages: Vec<Message>,
    /// Cursor the client resumes from
    pub cursor: Cursor,
}

impl FeedBatch {
    fn timed_out(cursor: Cursor) -> Self {
        Self {
            messages: Vec::new(),
            cursor,
        }
    }

    /// Whether the call ended without new messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Chat operations over an injected store
#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn MessageStore>,
    notifier: FeedNotifier,
    settings: FeedSettings,
}

impl ChatService {
    pub fn new(store: Arc<dyn MessageStore>, notifier: FeedNotifier, settings: FeedSettings) -> Self {
        Self {
            store,
            notifier,
            settings,
        }
    }

    pub fn settings(&self) -> FeedSettings {
        self.settings
    }

    pub fn notifier(&self) -> &FeedNotifier {
        &self.notifier
    }

    pub fn store(&self) -> &Arc<dyn MessageStore> {
        &self.store
    }

    /// Sanitize, validate and append a message, then wake waiting feeds
    ///
    /// # Errors
    ///
    /// * `BackendError::SharedError` (validation) - empty or overlong input;
    ///   nothing is written
    /// * `BackendError::StoreUnavailable` - the store failed
    pub async fn publish(
        &self,
        conversation: &ConversationId,
        username: &str,
        body: &str,
    ) -> Result<Message, BackendError> {
        let new_message = NewMessage::new(username, body).map_err(|e| {
            tracing::warn!("[Publish] Rejected message: {}", e);
            e
        })?;

        let message = self.store.append(conversation, new_message).await?;
        let woken = self.notifier.notify(conversation);

        tracing::info!(
            "[Publish] Message {} from {} in {} (woke {} waiting feeds)",
            message.id,
            message.username,
            conversation,
            woken
        );

        Ok(message)
    }

    /// Evict the conversation immediately
    pub async fn clear(&self, conversation: &ConversationId) -> Result<(), BackendError> {
        self.store.clear(conversation).await?;
        self.notifier.notify(conversation);
        tracing::info!("[Clear] Conversation {} cleared", conversation);
        Ok(())
    }

    /// Long-poll for messages after `cursor` using the configured budget
    pub async fn feed(
        &self,
        conversation: &ConversationId,
        cursor: Cursor,
    ) -> Result<FeedBatch, BackendError> {
        self.feed_within(conversation, cursor, self.settings.wait_budget)
            .await
    }

    /// Long-poll for messages after `cursor`, waiting at most `budget`
    ///
    /// Returns as soon as at least one message exists after the cursor, or
    /// an empty batch with the cursor unchanged once `budget` has elapsed.
    pub async fn feed_within(
        &self,
        conversation: &ConversationId,
        cursor: Cursor,
        budget: Duration,
    ) -> Result<FeedBatch, BackendError> {
        let deadline = Instant::now() + budget;
        let mut changes = self.notifier.subscribe(conversation);

        loop {
            let messages = self
                .bounded(deadline, self.store.list_since(conversation, cursor))
                .await?;

            if let Some(last) = messages.last() {
                let next = last.position();
                tracing::debug!(
                    "[Feed] {} new messages after {} in {}, next cursor {}",
                    messages.len(),
                    cursor,
                    conversation,
                    next
                );
                return Ok(FeedBatch {
                    messages,
                    cursor: next,
                });
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::debug!("[Feed] No messages after {} in {}, timed out", cursor, conversation);
                return Ok(FeedBatch::timed_out(cursor));
            }

            let recheck_at = (now + self.settings.recheck_interval).min(deadline);
            tokio::select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        // Channel gone; fall back to interval rechecks.
                        tokio::time::sleep_until(recheck_at).await;
                    }
                }
                _ = tokio::time::sleep_until(recheck_at) => {}
            }
        }
    }

    /// Run a store call, giving up once the deadline plus grace has passed
    async fn bounded<T>(
        &self,
        deadline: Instant,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, BackendError> {
        let started = Instant::now();
        let limit = deadline + self.settings.store_grace;
        match tokio::time::timeout_at(limit, call).await {
            Ok(result) => result.map_err(BackendError::from),
            Err(_) => {
                let allowed = limit.saturating_duration_since(started);
                tracing::error!("[Feed] Store call overran its {:?} limit", allowed);
                Err(StoreError::TimedOut(allowed).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::chat::clock::ManualClock;
    use crate::backend::chat::store::{MemoryStore, DEFAULT_RETENTION};

    fn service() -> ChatService {
        let store = MemoryStore::new(DEFAULT_RETENTION, Arc::new(ManualClock::new(1_700_000_000)));
        ChatService::new(Arc::new(store), FeedNotifier::new(), FeedSettings::default())
    }

    #[tokio::test]
    async fn test_origin_returns_backlog_immediately() {
        let chat = service();
        let conv = ConversationId::global();
        chat.publish(&conv, "alice", "hello").await.unwrap();
        chat.publish(&conv, "bob", "hi").await.unwrap();

        let started = Instant::now();
        let batch = chat.feed(&conv, Cursor::ORIGIN).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));

        let names: Vec<&str> = batch.messages.iter().map(|m| m.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
        assert_eq!(batch.cursor, batch.messages[1].position());
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_with_unchanged_cursor() {
        let chat = service();
        let conv = ConversationId::global();
        let message = chat.publish(&conv, "alice", "hello").await.unwrap();

        let started = Instant::now();
        let batch = chat.feed(&conv, message.position()).await.unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.cursor, message.position());
        assert!(started.elapsed() >= DEFAULT_WAIT_BUDGET);
        assert!(started.elapsed() < DEFAULT_WAIT_BUDGET + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_publish_validation_writes_nothing() {
        let chat = service();
        let conv = ConversationId::global();
        let err = chat.publish(&conv, "alice", "<b></b>").await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(chat.store().count_since(&conv, Cursor::ORIGIN).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clear_empties_feed() {
        let chat = service();
        let conv = ConversationId::global();
        chat.publish(&conv, "alice", "hello").await.unwrap();
        chat.clear(&conv).await.unwrap();
        let batch = chat.feed_within(&conv, Cursor::ORIGIN, Duration::ZERO).await.unwrap();
        assert!(batch.is_empty());
        assert!(batch.cursor.is_origin());
    }
}
