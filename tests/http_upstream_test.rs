//! Runs the service on a real socket in `http` upstream mode, so the public
//! listing reaches the mock API through reqwest with Basic auth.

use serde_json::Value;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use slot_sync::apis::{create_source, fetch_with_metrics, SourceEmulator};
use slot_sync::config::{Config, UpstreamMode};
use slot_sync::docs::fallback_openapi;
use slot_sync::server::{serve_on, AppState};

/// Serves on an ephemeral port; `configure` adjusts the config after the port is known
fn spawn_server(configure: impl FnOnce(&mut Config)) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = Config::default();
    config.server.port = addr.port();
    config.upstream.mode = UpstreamMode::Http;
    config.upstream.timeout_seconds = 5;
    configure(&mut config);

    let emulator = Arc::new(SourceEmulator::default());
    let source = create_source(&config, emulator.clone()).unwrap();
    let state = AppState::new(config, emulator, source, fallback_openapi());

    tokio::spawn(async move {
        serve_on(listener, state).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_listing_through_http_upstream() {
    let addr = spawn_server(|_| {});

    let body: Value = reqwest::get(format!("http://{addr}/api/available-slots?limit=50"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["pagination"]["total"], 17);
    assert_eq!(body["data"][4]["date"], "2025-07-21");
}

#[tokio::test]
async fn test_wrong_client_credentials_are_an_upstream_error() {
    let addr = spawn_server(|_| {});

    let mut client_config = Config::default();
    client_config.upstream.base_url = Some(format!("http://{addr}"));
    client_config.mock_api.password = "not-the-password".to_string();
    let emulator = Arc::new(SourceEmulator::default());
    let source = create_source(&client_config, emulator).unwrap();

    let err = fetch_with_metrics(source.as_ref()).await.unwrap_err();
    assert_eq!(err.kind(), "upstream");
}

#[tokio::test]
async fn test_unreachable_upstream_is_503() {
    // Reserve a port, then free it so nothing is listening there
    let dead_port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let addr = spawn_server(move |config| {
        config.upstream.base_url = Some(format!("http://127.0.0.1:{dead_port}"));
    });

    let response = reqwest::get(format!("http://{addr}/api/available-slots")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "External API temporarily unavailable");
}
