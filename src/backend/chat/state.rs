use crate::shared::{Cursor, Message};

/// In-memory contents of one conversation
///
/// Messages are kept in arrival order, which is also id order, so cursor
/// lookups are a binary search.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    messages: Vec<Message>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. Its id and timestamp must not go backwards.
    pub fn push(&mut self, message: Message) {
        debug_assert!(self
            .newest()
            .map_or(true, |last| last.id < message.id && last.created_at <= message.created_at));
        self.messages.push(message);
    }

    /// Messages strictly after `cursor`, in arrival order
    pub fn messages_since(&self, cursor: Cursor) -> Vec<Message> {
        self.messages[self.first_after(cursor)..].to_vec()
    }

    /// Number of messages strictly after `cursor`
    pub fn count_since(&self, cursor: Cursor) -> usize {
        self.messages.len() - self.first_after(cursor)
    }

    pub fn newest(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Whether the newest message is older than the retention window
    ///
    /// An empty conversation is never stale.
    pub fn is_stale(&self, now: i64, retention_secs: i64) -> bool {
        self.newest()
            .map_or(false, |last| last.created_at < now.saturating_sub(retention_secs))
    }

    fn first_after(&self, cursor: Cursor) -> usize {
        self.messages.partition_point(|m| !cursor.admits(m.id))
    }
}
