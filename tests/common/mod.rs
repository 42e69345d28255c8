//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration tests:
//! - A `TestApp` wrapping an in-memory server
//! - Authentication helpers for registering users
//! - Custom assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod auth_helpers;

pub use auth_helpers::*;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestResponse, TestServer};
use beans::backend::mail::Mailer;
use beans::backend::routes::create_router;
use beans::backend::server::{build_state, AppState};
use beans::shared::{AppConfig, AppConfigBuilder};
use serde_json::Value;
use tempfile::TempDir;

/// A server backed by a fresh store, a temporary image directory and a
/// memory mailer
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub mailer: Mailer,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|builder| builder).await
    }

    /// Start from the test defaults and adjust the configuration
    pub async fn with_config(adjust: impl FnOnce(AppConfigBuilder) -> AppConfigBuilder) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let builder = AppConfig::builder()
            .base_url("http://localhost:3200")
            .image_dir(dir.path().join("images"))
            .bcrypt_cost(4);
        let config = adjust(builder).build().unwrap();

        let mailer = Mailer::memory();
        let state = build_state(config, mailer.clone()).await.unwrap();
        let server = TestServer::new(create_router(state.clone())).unwrap();

        Self {
            server,
            state,
            mailer,
            dir,
        }
    }

    pub async fn get(&self, path: &str, token: &str, query: Value) -> TestResponse {
        with_token(self.server.get(path), token)
            .add_query_params(query)
            .await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> TestResponse {
        with_token(self.server.post(path), token).json(&body).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> TestResponse {
        with_token(self.server.put(path), token).json(&body).await
    }

    pub async fn delete(&self, path: &str, token: &str, query: Value) -> TestResponse {
        with_token(self.server.delete(path), token)
            .add_query_params(query)
            .await
    }
}

fn with_token(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        HeaderName::from_static("token"),
        HeaderValue::from_str(token).unwrap(),
    )
}
