/**
 * Chat Route Configuration
 *
 * - `GET /messages` - long-poll feed
 * - `POST /messages` - publish (also `/messages/add-message`)
 * - `POST /messages/clear` - clear (also `/messages/clear-messages`)
 */

use crate::backend::chat::handlers::{handle_clear, handle_feed, handle_publish};
use crate::backend::server::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Add the chat routes to a router
pub fn configure_chat_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/messages", get(handle_feed).post(handle_publish))
        .route("/messages/add-message", post(handle_publish))
        .route("/messages/clear", post(handle_clear))
        .route("/messages/clear-messages", post(handle_clear))
}
