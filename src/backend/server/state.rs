/**
 * Application State Management
 *
 * `AppState` is the axum router state. It holds the chat service (store,
 * notifier and feed settings) and implements `FromRef` so handlers can
 * extract just the part they need.
 *
 * # Example
 *
 * ```rust
 * use pollchat::backend::chat::ChatService;
 * use axum::extract::State;
 *
 * async fn handler(State(chat): State<ChatService>) {
 *     let _settings = chat.settings();
 * }
 * ```
 */

use crate::backend::chat::feed::ChatService;
use crate::backend::realtime::FeedNotifier;
use axum::extract::FromRef;

/// Router state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Feed, publish and clear over the configured store
    pub chat: ChatService,
}

impl AppState {
    pub fn new(chat: ChatService) -> Self {
        Self { chat }
    }

    /// The notifier waiting feed calls subscribe to
    pub fn notifier(&self) -> FeedNotifier {
        self.chat.notifier().clone()
    }
}

impl FromRef<AppState> for ChatService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.chat.clone()
    }
}

impl FromRef<AppState> for FeedNotifier {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.notifier()
    }
}
