/**
 * Feed Notifier
 *
 * Long-poll feed calls wait here instead of sleeping and re-polling the
 * store. Each conversation gets a `tokio::sync::watch` channel holding a
 * revision counter; publish and clear bump it and every waiting feed call
 * wakes up and re-reads the store.
 *
 * # Ordering
 *
 * A waiter subscribes *before* it reads the store, and writers notify
 * *after* their write is visible. Whichever way a publish races a feed
 * call, the feed either sees the message in its read or gets woken by the
 * bump that follows it.
 *
 * A `watch` channel only keeps the latest value, so a burst of publishes
 * costs one wake-up per waiter, not one per message.
 */

use crate::backend::chat::store::ConversationId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Per-conversation wake-up channels for waiting feed calls
#[derive(Clone, Debug, Default)]
pub struct FeedNotifier {
    channels: Arc<Mutex<HashMap<ConversationId, watch::Sender<u64>>>>,
}

impl FeedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn channels(&self) -> MutexGuard<'_, HashMap<ConversationId, watch::Sender<u64>>> {
        // The map holds no invariant a panicking holder could break.
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a receiver for a conversation, creating its channel if needed
    ///
    /// The returned receiver has already seen the current revision, so
    /// `changed()` resolves on the next notification only.
    pub fn subscribe(&self, conversation: &ConversationId) -> watch::Receiver<u64> {
        let mut channels = self.channels();
        let mut receiver = channels
            .entry(conversation.clone())
            .or_insert_with(|| watch::channel(0).0)
            .subscribe();
        receiver.mark_unchanged();
        receiver
    }

    /// Wake every feed call waiting on `conversation`
    ///
    /// Returns the number of receivers notified (0 if nobody is waiting).
    pub fn notify(&self, conversation: &ConversationId) -> usize {
        match self.channels().get(conversation) {
            Some(sender) => {
                sender.send_modify(|revision| *revision = revision.wrapping_add(1));
                sender.receiver_count()
            }
            None => 0,
        }
    }

    /// Drop channels nobody is listening on
    pub fn cleanup_inactive_channels(&self) -> usize {
        let mut channels = self.channels();
        let before = channels.len();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        before - channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_notify_wakes_subscriber() {
        let notifier = FeedNotifier::new();
        let conv = ConversationId::global();
        let mut rx = notifier.subscribe(&conv);

        assert_eq!(notifier.notify(&conv), 1);
        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("woken")
            .expect("sender alive");
    }

    #[tokio::test]
    async fn test_subscriber_does_not_see_past_notifications() {
        let notifier = FeedNotifier::new();
        let conv = ConversationId::global();
        let _first = notifier.subscribe(&conv);
        notifier.notify(&conv);

        let rx = notifier.subscribe(&conv);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_notify_without_subscribers() {
        let notifier = FeedNotifier::new();
        assert_eq!(notifier.notify(&ConversationId::global()), 0);
    }

    #[test]
    fn test_cleanup_inactive_channels() {
        let notifier = FeedNotifier::new();
        let busy = ConversationId::new("busy");
        let idle = ConversationId::new("idle");
        let _rx = notifier.subscribe(&busy);
        drop(notifier.subscribe(&idle));

        assert_eq!(notifier.cleanup_inactive_channels(), 1);
        assert_eq!(notifier.notify(&busy), 1);
        assert_eq!(notifier.notify(&idle), 0);
    }
}
