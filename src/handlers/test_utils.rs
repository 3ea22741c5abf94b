//! Helpers for driving the router against an in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    server::{router, State},
    store::memory::MemoryStore,
};

pub(crate) struct TestApp {
    router: Router,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        Self::with_store(MemoryStore::default())
    }

    pub(crate) fn with_store(store: MemoryStore) -> Self {
        Self {
            router: router(State::new(Box::new(store))),
        }
    }

    pub(crate) async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    /// Sends `request` and decodes the response body as JSON.
    pub(crate) async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    /// Posts `body` and asserts it was accepted.
    pub(crate) async fn seed(&self, uri: &str, body: Value) {
        let (status, response) = self.send_json(post(uri, &body.to_string())).await;
        assert_eq!(status, StatusCode::CREATED, "seeding {uri} failed: {response}");
    }

    pub(crate) async fn seed_user(&self, name: &str) {
        self.seed(
            "/users",
            serde_json::json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "password_hash": "h",
                "role": "donor",
            }),
        )
        .await;
    }
}

pub(crate) fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub(crate) fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}
