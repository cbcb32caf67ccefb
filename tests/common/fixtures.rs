//! App fixtures and HTTP helpers

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use pollchat::backend::chat::{FeedSettings, ManualClock, MemoryStore, MessageStore};
use pollchat::backend::server::build_app;
use pollchat::shared::{Cursor, FeedResponse};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Fixed start time for the manual clock (2023-11-14 22:13:20 UTC)
pub const START: i64 = 1_700_000_000;

/// Retention used by fixtures
pub const RETENTION: Duration = Duration::from_secs(86_400);

/// A router over a memory store, plus handles to the store and clock
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub settings: FeedSettings,
}

/// Short budgets so real-time tests finish quickly
pub fn fast_settings() -> FeedSettings {
    FeedSettings {
        wait_budget: Duration::from_millis(300),
        recheck_interval: Duration::from_millis(50),
        store_grace: Duration::from_millis(100),
    }
}

impl TestApp {
    pub fn new(settings: FeedSettings) -> Self {
        let clock = Arc::new(ManualClock::new(START));
        let store = Arc::new(MemoryStore::new(RETENTION, clock.clone()));
        let router = build_app(store.clone() as Arc<dyn MessageStore>, settings);
        Self {
            router,
            store,
            clock,
            settings,
        }
    }

    pub fn fast() -> Self {
        Self::new(fast_settings())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn publish(&self, username: &str, body: &str) -> StatusCode {
        self.send(publish_request("/messages", username, body)).await.status()
    }

    pub async fn feed(&self, cursor: Cursor) -> FeedResponse {
        let response = self.send(feed_request(cursor)).await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }
}

pub fn feed_request(cursor: Cursor) -> Request<Body> {
    get_request(&format!("/messages?cursor={}", cursor))
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub fn post_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

/// Form-encoded publish request
pub fn publish_request(uri: &str, username: &str, body: &str) -> Request<Body> {
    form_request(uri, &[("username", username), ("body", body)])
}

pub fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let encoded = serde_urlencoded::to_string(fields).expect("encodable form");
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(encoded))
        .expect("valid request")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body")
        .to_vec()
}

pub async fn body_json<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
    serde_json::from_slice(&body_bytes(response).await).expect("JSON body")
}
