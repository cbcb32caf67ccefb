//! Property-based tests for feed ordering
//!
//! Random interleavings of publishes and polls must deliver every message
//! exactly once, in publish order, to a client that always resumes from the
//! cursor it was last given.

mod common;

use common::{RETENTION, START};
use pollchat::backend::chat::{
    ChatService, ConversationId, FeedSettings, ManualClock, MemoryStore, MessageStore,
};
use pollchat::backend::realtime::FeedNotifier;
use pollchat::shared::{Cursor, Message};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Step {
    Publish(String),
    Poll,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        "[a-z]{1,12}".prop_map(Step::Publish),
        Just(Step::Poll),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn chat() -> (ChatService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(RETENTION, Arc::new(ManualClock::new(START))));
    let chat = ChatService::new(
        store.clone() as Arc<dyn MessageStore>,
        FeedNotifier::new(),
        FeedSettings::default(),
    );
    (chat, store)
}

proptest! {
    #[test]
    fn test_no_loss_no_duplication(steps in prop::collection::vec(step(), 0..60)) {
        let (delivered, published) = runtime().block_on(async {
            let (chat, _) = chat();
            let conv = ConversationId::global();
            let mut cursor = Cursor::ORIGIN;
            let mut delivered: Vec<Message> = Vec::new();
            let mut published: Vec<Message> = Vec::new();

            for step in steps {
                match step {
                    Step::Publish(body) => {
                        published.push(chat.publish(&conv, "alice", &body).await.unwrap());
                    }
                    Step::Poll => {
                        let batch = chat.feed_within(&conv, cursor, Duration::ZERO).await.unwrap();
                        cursor = batch.cursor;
                        delivered.extend(batch.messages);
                    }
                }
            }

            // Drain whatever the last poll did not see.
            let batch = chat.feed_within(&conv, cursor, Duration::ZERO).await.unwrap();
            delivered.extend(batch.messages);
            (delivered, published)
        });

        prop_assert_eq!(delivered, published);
    }

    #[test]
    fn test_later_cursor_sees_suffix(count in 1usize..40, a in 0usize..40, b in 0usize..40) {
        let (i, j) = (a % (count + 1), b % (count + 1));
        let (earlier, later) = (i.min(j), i.max(j));
        runtime().block_on(async {
            let (chat, store) = chat();
            let conv = ConversationId::global();
            let mut positions = vec![Cursor::ORIGIN];
            for i in 0..count {
                let message = chat.publish(&conv, "bob", &format!("m{i}")).await.unwrap();
                positions.push(message.position());
            }

            let (c1, c2) = (positions[earlier], positions[later]);
            let from_c1 = store.list_since(&conv, c1).await.unwrap();
            let from_c2 = store.list_since(&conv, c2).await.unwrap();
            let restricted: Vec<Message> = from_c1.into_iter().filter(|m| c2.admits(m.id)).collect();
            assert_eq!(restricted, from_c2);
        });
    }

    #[test]
    fn test_cursor_roundtrips_through_query_string(value in any::<u64>()) {
        let cursor = Cursor::parse_lenient(&value.to_string());
        prop_assert_eq!(cursor.value(), value);
    }
}
