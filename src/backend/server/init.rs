/**
 * Server Initialization
 *
 * Builds the axum application from a [`ServerConfig`]:
 *
 * 1. Open the message store (SQLite or memory)
 * 2. Create the feed notifier and the chat service
 * 3. Start the periodic cleanup of idle notifier channels
 * 4. Create the router
 *
 * Tests skip the config and call [`build_app`] with their own store and
 * settings.
 */

use crate::backend::chat::clock::{Clock, SystemClock};
use crate::backend::chat::feed::{ChatService, FeedSettings};
use crate::backend::chat::store::MessageStore;
use crate::backend::realtime::FeedNotifier;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_store, ServerConfig};
use crate::backend::server::state::AppState;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;

/// How often idle notifier channels are dropped
pub const CHANNEL_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Create and configure the axum application
pub async fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing chat server");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = load_store(config, clock).await;
    let state = build_state(store, config.feed_settings());

    spawn_channel_cleanup(state.notifier());
    tracing::info!("Router configured with periodic cleanup task");

    create_router(state)
}

/// Assemble the router state around an existing store
pub fn build_state(store: Arc<dyn MessageStore>, settings: FeedSettings) -> AppState {
    AppState::new(ChatService::new(store, FeedNotifier::new(), settings))
}

/// Build a router over an existing store, without background tasks
pub fn build_app(store: Arc<dyn MessageStore>, settings: FeedSettings) -> Router<()> {
    create_router(build_state(store, settings))
}

fn spawn_channel_cleanup(notifier: FeedNotifier) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CHANNEL_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = notifier.cleanup_inactive_channels();
            tracing::debug!("Cleaned up {} inactive feed channels", removed);
        }
    });
}
