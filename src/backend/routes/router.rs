/**
 * Main Router Creation
 *
 * Assembles the chat routes, the health probe, request tracing and the 404
 * fallback into one router over [`AppState`].
 *
 * # Route Order
 *
 * 1. Chat routes (`/messages`, publish and clear aliases)
 * 2. `GET /health`
 * 3. Fallback: 404
 */

use crate::backend::routes::chat_routes::configure_chat_routes;
use crate::backend::server::state::AppState;
use axum::{http::StatusCode, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_chat_routes(Router::new());

    let router = router.route("/health", get(|| async { "ok" }));

    let router = router.fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") });

    router
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}
