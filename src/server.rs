use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, ORIGIN, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
        request::Parts,
        HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode, Uri,
    },
    middleware::{self, Next},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{SecondsFormat, Utc};
use hyper::Server;
use serde::Serialize;
use serde_json::{json, Value};
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::apis::{create_source, fetch_with_metrics, SlotSource, SourceEmulator};
use crate::auth::{check_basic_auth, AuthError};
use crate::config::Config;
use crate::constants::{
    API_DOCS_PATH, AVAILABLE_SLOTS_PATH, CORS_MAX_AGE_SECS, MOCK_API_VERSION, MOCK_SLOTS_PATH, OPENAPI_JSON_PATH,
    SERVICE_NAME, SERVICE_VERSION,
};
use crate::docs::{load_openapi, swagger_ui_html};
use crate::error::Result;
use crate::metrics::ApiMetrics;
use crate::pipeline::listing::{list_slots, SlotQuery};
use crate::pipeline::processing::normalize::normalize;
use crate::types::ApiResponse;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub emulator: Arc<SourceEmulator>,
    pub source: Arc<dyn SlotSource>,
    pub openapi: Arc<Value>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, emulator: Arc<SourceEmulator>, source: Arc<dyn SlotSource>, openapi: Value) -> Self {
        Self {
            config: Arc::new(config),
            emulator,
            source,
            openapi: Arc::new(openapi),
            started_at: Instant::now(),
        }
    }

    /// Loads the emulator data and API docs, and wires the configured upstream
    pub fn from_config(config: Config) -> Result<Self> {
        let emulator = Arc::new(SourceEmulator::load(Path::new(&config.mock_api.appointments_path)));
        let source = create_source(&config, emulator.clone())?;
        let openapi = load_openapi(Path::new(&config.docs.openapi_path));
        Ok(Self::new(config, emulator, source, openapi))
    }
}

/// Body of the mock upstream's slot listing
#[derive(Debug, Serialize)]
struct MockSlotsResponse {
    success: bool,
    data: Vec<Value>,
    message: &'static str,
    api_version: &'static str,
    timestamp: String,
    total_records: usize,
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::error(error, message))).into_response()
}

/// Hello endpoint
async fn hello() -> impl IntoResponse {
    Json(ApiResponse::ok(json!({
        "message": "Hello World! 🌍",
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "timestamp": timestamp()
    })))
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(json!({
        "status": "healthy",
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "timestamp": timestamp(),
        "environment": state.config.server.environment
    })))
}

/// The emulated third-party scheduling API, behind Basic auth
async fn mock_slots(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let header = match headers.get(AUTHORIZATION).map(HeaderValue::to_str) {
        None => None,
        Some(Ok(value)) => Some(value),
        Some(Err(_)) => return auth_failure(AuthError::InvalidEncoding),
    };

    let username = match check_basic_auth(header, &state.config.mock_api) {
        Ok(username) => username,
        Err(e) => return auth_failure(e),
    };
    info!("Authenticated request from: {}", username);

    match state.emulator.generate_messy_response() {
        Ok(data) => Json(MockSlotsResponse {
            success: true,
            total_records: data.len(),
            data,
            message: "Mock external API response",
            api_version: MOCK_API_VERSION,
            timestamp: timestamp(),
        })
        .into_response(),
        Err(e) => {
            error!("Mock API failed to generate records: {}", e);
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable",
                "Mock external API temporarily unavailable",
            )
        }
    }
}

fn auth_failure(e: AuthError) -> Response {
    if let AuthError::InvalidCredentials { username } = &e {
        warn!("Invalid login attempt: {}", username);
    }
    ApiMetrics::record_auth_failure(e.reason());
    error_response(e.status(), e.label(), e.to_string())
}

/// Public unified listing: fetch, normalize, filter, paginate
async fn available_slots(
    State(state): State<AppState>,
    query: std::result::Result<Query<SlotQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!("Rejected slot query: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, "Bad Request", rejection.body_text());
        }
    };
    info!("Public request for available slots");

    let records = match fetch_with_metrics(state.source.as_ref()).await {
        Ok(records) => records,
        Err(e) => {
            error!("Upstream fetch failed: {}", e);
            ApiMetrics::record_unavailable();
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable",
                "External API temporarily unavailable",
            );
        }
    };

    let slots = normalize(&records);
    let page = list_slots(slots, &query);

    info!(
        "Returning page {} of {} ({} slots)",
        page.pagination.page,
        page.pagination.pages,
        page.slots.len()
    );
    ApiMetrics::record_slots_served(page.slots.len(), page.pagination.total);

    Json(
        ApiResponse::ok(page.slots)
            .with_message("Available appointment slots")
            .with_pagination(page.pagination),
    )
    .into_response()
}

async fn api_docs() -> impl IntoResponse {
    Html(swagger_ui_html())
}

async fn openapi_json(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.openapi.as_ref().clone())
}

async fn metrics_endpoint() -> Response {
    match crate::metrics::render() {
        Some(body) => ([(CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response(),
        None => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Service unavailable",
            "Metrics recorder not installed",
        ),
    }
}

async fn not_found(method: Method, uri: Uri) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "Endpoint not found",
        format!("{} {} does not exist", method, uri.path()),
    )
}

fn origin_allowed(allowed: &[String], origin: &HeaderValue) -> bool {
    allowed.iter().any(|a| a.as_bytes() == origin.as_bytes())
}

/// Requests carrying an `Origin` outside the configured list are refused
/// with 400 before they reach any route
async fn reject_disallowed_origin(State(state): State<AppState>, request: Request<Body>, next: Next<Body>) -> Response {
    if let Some(origin) = request.headers().get(ORIGIN) {
        if !origin_allowed(&state.config.server.allowed_origins, origin) {
            warn!("CORS blocked origin: {:?}", origin);
            return error_response(StatusCode::BAD_REQUEST, "Bad Request", "Not allowed by CORS policy");
        }
    }
    next.run(request).await
}

/// CORS restricted to the configured origins
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allowed: Vec<String> = allowed_origins.to_vec();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
            origin_allowed(&allowed, origin)
        }))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, HeaderName::from_static("x-requested-with")])
        .max_age(Duration::from_secs(CORS_MAX_AGE_SECS))
}

/// Create the HTTP router with all routes. Unknown paths and unsupported
/// methods on known paths both answer 404.
pub fn create_server(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);

    Router::new()
        .route("/", get(hello).fallback(not_found))
        .route("/health", get(health).fallback(not_found))
        .route("/metrics", get(metrics_endpoint).fallback(not_found))
        .route(MOCK_SLOTS_PATH, get(mock_slots).fallback(not_found))
        .route(AVAILABLE_SLOTS_PATH, get(available_slots).fallback(not_found))
        .route(API_DOCS_PATH, get(api_docs).fallback(not_found))
        .route(OPENAPI_JSON_PATH, get(openapi_json).fallback(not_found))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::if_not_present(
                    X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    REFERRER_POLICY,
                    HeaderValue::from_static("no-referrer"),
                ))
                .layer(middleware::from_fn_with_state(state.clone(), reject_disallowed_origin))
                .layer(cors),
        )
        .with_state(state)
}

/// Start the HTTP server on the specified port, until Ctrl-C
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_server(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Server running on http://localhost:{port}");
    info!("Public slots:  http://localhost:{port}{AVAILABLE_SLOTS_PATH}");
    info!("Mock PMS API:  http://localhost:{port}{MOCK_SLOTS_PATH} (Basic auth)");
    info!("API docs:      http://localhost:{port}{API_DOCS_PATH}");

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Serve on an already bound listener; used where the port is picked by the OS
pub async fn serve_on(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let app = create_server(state);
    Server::from_tcp(listener)?.serve(app.into_make_service()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
