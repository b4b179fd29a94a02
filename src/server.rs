//! Member lookup HTTP server.
//!
//! Every tenant-scoped route resolves the tenant first; an identifier that
//! does not match an enabled tenant is a 404 no matter which sub-action was
//! requested, so disabled and unknown locations look the same from outside.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | HTML list of enabled locations |
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/{tenant}` | HTML lookup page for a location |
//! | `GET`  | `/api/{tenant}/search?query=` | `{ "contacts": [...] }` |
//! | `GET`  | `/api/{tenant}/config` | Public form links for a location |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Location not found" } }
//! ```
//!
//! Error codes: `not_found` (404), `upstream_error` (the CRM's status, or
//! 502 when that status is not an error code), `internal` (500).

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{Contact, PublicConfig, SearchQuery, TenantRecord};
use crate::pages;
use crate::search::run_search;
use crate::tenants::TenantRegistry;
use crate::upstream::{ContactDirectory, HttpDirectory, UpstreamError};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Enabled tenants, fixed for the process lifetime.
    pub tenants: Arc<TenantRegistry>,
    /// CRM client used by the search route.
    pub directory: Arc<dyn ContactDirectory>,
}

impl AppState {
    pub fn new(tenants: TenantRegistry, directory: Arc<dyn ContactDirectory>) -> Self {
        Self {
            tenants: Arc::new(tenants),
            directory,
        }
    }

    fn tenant(&self, identifier: &str) -> Result<&TenantRecord, AppError> {
        self.tenants
            .resolve(identifier)
            .ok_or_else(|| not_found("Location not found"))
    }
}

/// Build the router. Split out from [`run_server`] so tests can drive it
/// without binding a socket.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_home))
        .route("/health", get(handle_health))
        .route("/api/{tenant}/search", get(handle_search))
        .route("/api/{tenant}/config", get(handle_config))
        .route("/{tenant}", get(handle_location_page))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server.
///
/// Builds the tenant registry and the CRM client from `config`, binds
/// `server.bind` and serves until the process is terminated.
///
/// # Errors
///
/// Returns an error if the tenant configuration is invalid or binding fails.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let tenants = TenantRegistry::from_records(config.tenants.clone())?;
    if tenants.is_empty() {
        warn!("no enabled tenants configured; every location will return 404");
    }
    let directory = Arc::new(HttpDirectory::new(&config.upstream)?);
    let state = AppState::new(tenants, directory);

    info!(
        tenants = state.tenants.len(),
        upstream = %config.upstream.base_url,
        "member lookup listening on http://{}",
        config.server.bind
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Rejected { status, .. } => AppError {
                status: StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                code: "upstream_error".to_string(),
                message: "Failed to search contacts".to_string(),
            },
            UpstreamError::Transport(_) => AppError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "internal".to_string(),
                message: "Search failed".to_string(),
            },
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET / and GET /{tenant} ============

async fn handle_home(State(state): State<AppState>) -> Html<String> {
    Html(pages::home_page(state.tenants.enabled()))
}

async fn handle_location_page(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
) -> Response {
    match state.tenants.resolve(&tenant) {
        Some(tenant) => Html(pages::location_page(tenant)).into_response(),
        None => (StatusCode::NOT_FOUND, "Location not found").into_response(),
    }
}

// ============ GET /api/{tenant}/search ============

/// Query string for the search route. A missing `query` is an empty query.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub contacts: Vec<Contact>,
}

/// Handler for `GET /api/{tenant}/search`.
///
/// A malformed query string degrades to an empty query rather than a 400.
async fn handle_search(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let tenant = state.tenant(&identifier)?;

    let params = params.map(|Query(p)| p).unwrap_or_default();
    let query = SearchQuery {
        tenant_identifier: identifier,
        query_text: params.query,
    };

    let contacts = run_search(state.directory.as_ref(), tenant, &query).await?;
    Ok(Json(SearchResponse { contacts }))
}

// ============ GET /api/{tenant}/config ============

async fn handle_config(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
) -> Result<Json<PublicConfig>, AppError> {
    let tenant = state.tenant(&tenant)?;
    Ok(Json(PublicConfig::from(tenant)))
}
