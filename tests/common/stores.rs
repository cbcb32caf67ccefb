//! Stores that misbehave on purpose

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use pollchat::backend::chat::{ConversationId, MessageStore, NewMessage, StoreError};
use pollchat::shared::{Cursor, Message};

/// Every call fails as if the database were unreachable
#[derive(Debug, Default)]
pub struct FailingStore;

fn down<T>() -> Result<T, StoreError> {
    Err(StoreError::unavailable("connection refused"))
}

#[async_trait]
impl MessageStore for FailingStore {
    async fn append(&self, _: &ConversationId, _: NewMessage) -> Result<Message, StoreError> {
        down()
    }
    async fn list_since(&self, _: &ConversationId, _: Cursor) -> Result<Vec<Message>, StoreError> {
        down()
    }
    async fn count_since(&self, _: &ConversationId, _: Cursor) -> Result<usize, StoreError> {
        down()
    }
    async fn newest(&self, _: &ConversationId) -> Result<Option<Message>, StoreError> {
        down()
    }
    async fn evict_if_stale(&self, _: &ConversationId) -> Result<bool, StoreError> {
        down()
    }
    async fn clear(&self, _: &ConversationId) -> Result<(), StoreError> {
        down()
    }
}

/// Every call hangs forever
#[derive(Debug, Default)]
pub struct HangingStore;

async fn hang<T>() -> Result<T, StoreError> {
    std::future::pending().await
}

#[async_trait]
impl MessageStore for HangingStore {
    async fn append(&self, _: &ConversationId, _: NewMessage) -> Result<Message, StoreError> {
        hang().await
    }
    async fn list_since(&self, _: &ConversationId, _: Cursor) -> Result<Vec<Message>, StoreError> {
        hang().await
    }
    async fn count_since(&self, _: &ConversationId, _: Cursor) -> Result<usize, StoreError> {
        hang().await
    }
    async fn newest(&self, _: &ConversationId) -> Result<Option<Message>, StoreError> {
        hang().await
    }
    async fn evict_if_stale(&self, _: &ConversationId) -> Result<bool, StoreError> {
        hang().await
    }
    async fn clear(&self, _: &ConversationId) -> Result<(), StoreError> {
        hang().await
    }
}

/// Answers the first `list_since` with nothing, then hangs on every call
#[derive(Debug, Default)]
pub struct StallingStore {
    reads: AtomicUsize,
}

#[async_trait]
impl MessageStore for StallingStore {
    async fn append(&self, _: &ConversationId, _: NewMessage) -> Result<Message, StoreError> {
        hang().await
    }
    async fn list_since(&self, _: &ConversationId, _: Cursor) -> Result<Vec<Message>, StoreError> {
        if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
            return Ok(Vec::new());
        }
        hang().await
    }
    async fn count_since(&self, _: &ConversationId, _: Cursor) -> Result<usize, StoreError> {
        hang().await
    }
    async fn newest(&self, _: &ConversationId) -> Result<Option<Message>, StoreError> {
        hang().await
    }
    async fn evict_if_stale(&self, _: &ConversationId) -> Result<bool, StoreError> {
        hang().await
    }
    async fn clear(&self, _: &ConversationId) -> Result<(), StoreError> {
        hang().await
    }
}
