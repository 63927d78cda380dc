#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header::AUTHORIZATION, Request, Response};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use slot_sync::apis::{LocalPmsSource, SlotSource, SourceEmulator};
use slot_sync::config::{Config, UpstreamMode};
use slot_sync::docs::fallback_openapi;
use slot_sync::error::{Result, SyncError};
use slot_sync::server::{create_server, AppState};

/// Upstream that is always down
pub struct FailingSource;

#[async_trait::async_trait]
impl SlotSource for FailingSource {
    fn source_name(&self) -> &'static str {
        "failing"
    }

    async fn fetch_records(&self) -> Result<Vec<Value>> {
        Err(SyncError::upstream("connection refused"))
    }
}

/// Upstream returning a fixed batch of records
pub struct FixedSource(pub Vec<Value>);

#[async_trait::async_trait]
impl SlotSource for FixedSource {
    fn source_name(&self) -> &'static str {
        "fixed"
    }

    async fn fetch_records(&self) -> Result<Vec<Value>> {
        Ok(self.0.clone())
    }
}

pub fn local_config() -> Config {
    let mut config = Config::default();
    config.upstream.mode = UpstreamMode::Local;
    config.server.environment = "test".to_string();
    config
}

pub fn app_with_source(source: Arc<dyn SlotSource>) -> Router {
    let emulator = Arc::new(SourceEmulator::default());
    create_server(AppState::new(local_config(), emulator, source, fallback_openapi()))
}

/// Router backed by the built-in emulator data, reached in-process
pub fn local_app() -> Router {
    let emulator = Arc::new(SourceEmulator::default());
    let source = Arc::new(LocalPmsSource::new(emulator.clone()));
    create_server(AppState::new(local_config(), emulator, source, fallback_openapi()))
}

pub fn basic(raw: &str) -> String {
    format!("Basic {}", STANDARD.encode(raw))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_auth(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<axum::body::BoxBody> {
    app.oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<axum::body::BoxBody>) -> Value {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
