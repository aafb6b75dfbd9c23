//! Router-level test harness.
//!
//! Wires the real axum router to mock upstreams, a manual clock and in-memory
//! persistence, then drives it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use aggregator_core::kernel::{ServerDeps, TestDependencies};
use aggregator_core::server::build_app;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

pub struct TestHarness {
    pub test: TestDependencies,
    pub deps: ServerDeps,
    router: Router,
}

impl TestHarness {
    pub fn new(test: TestDependencies) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let deps = test.server_deps();
        Self::with_deps(test, deps)
    }

    /// Use prebuilt deps (e.g. a cache loaded from an image).
    pub fn with_deps(test: TestDependencies, deps: ServerDeps) -> Self {
        let router = build_app(deps.clone());
        Self { test, deps, router }
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.send(Method::GET, path, Body::empty()).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, path, Body::empty()).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, Body::from(body.to_string()))
            .await
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> (StatusCode, Value) {
        self.send(Method::POST, path, Body::from(body.to_string()))
            .await
    }

    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let (status, bytes) = self.send_raw(Method::GET, path, Body::empty()).await;
        (status, String::from_utf8(bytes).unwrap())
    }

    async fn send(&self, method: Method, path: &str, body: Body) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(method, path, body).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn send_raw(&self, method: Method, path: &str, body: Body) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }
}
