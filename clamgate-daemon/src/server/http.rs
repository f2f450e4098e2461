//! HTTP routes and handlers for the gateway.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::BytesRejection,
        DefaultBodyLimit, State,
    },
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clamgate_core::ScanResult;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::cors::cors_middleware;
use super::error::ApiError;
use super::state::AppState;

/// Largest file accepted by `/scan/file`.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Room for multipart boundaries and part headers on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Multipart field holding the upload.
const FILE_FIELD: &str = "file";

/// Create the main router with all routes.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ping", get(ping))
        .route("/version", get(version))
        .route("/scan/text", post(scan_text).fallback(method_not_allowed))
        .route("/scan/file", post(scan_file).fallback(method_not_allowed))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + FORM_OVERHEAD_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(cors_middleware)),
        )
        .with_state(Arc::new(state))
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct TextScanResponse {
    pub results: Vec<ScanResult>,
}

#[derive(Debug, Serialize)]
pub struct FileScanResponse {
    pub filename: String,
    pub size: usize,
    pub results: Vec<ScanResult>,
}

/// Run a daemon call under the endpoint deadline.
async fn call_daemon<T, F>(
    action: &'static str,
    deadline: Duration,
    call: F,
) -> Result<T, ApiError>
where
    F: Future<Output = clamgate_core::Result<T>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ApiError::backend(action, e)),
        Err(_) => Err(ApiError::backend(
            action,
            format!("deadline of {:?} exceeded", deadline),
        )),
    }
}

// =============================================================================
// Health & Version
// =============================================================================

async fn ping(State(state): State<Arc<AppState>>) -> Result<Json<PingResponse>, ApiError> {
    let alive = call_daemon(
        "Failed to ping ClamAV",
        state.deadlines.ping,
        state.scanner.ping(),
    )
    .await?;

    let message = if alive {
        "ClamAV daemon is responding"
    } else {
        "ClamAV daemon gave an unexpected ping reply"
    };

    Ok(Json(PingResponse {
        success: alive,
        message: message.to_string(),
    }))
}

async fn version(State(state): State<Arc<AppState>>) -> Result<Json<VersionResponse>, ApiError> {
    let version = call_daemon(
        "Failed to get ClamAV version",
        state.deadlines.version,
        state.scanner.version(),
    )
    .await?;

    Ok(Json(VersionResponse { version }))
}

// =============================================================================
// Scanning
// =============================================================================

async fn scan_text(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TextScanResponse>, ApiError> {
    let body = body.map_err(|_| ApiError::BadRequest("Failed to read request body"))?;

    let results = call_daemon(
        "Scan failed",
        state.deadlines.scan_text,
        state.scanner.scan(body),
    )
    .await?;

    Ok(Json(TextScanResponse { results }))
}

async fn scan_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FileScanResponse>, ApiError> {
    let (filename, data) = read_upload(multipart).await?;
    let size = data.len();

    info!("Received file: {}, size: {} bytes", filename, size);

    let results: Vec<ScanResult> = call_daemon(
        "Scan failed",
        state.deadlines.scan_file,
        state.scanner.scan(data),
    )
    .await?
    .into_iter()
    .map(|result| result.with_filename(filename.as_str()))
    .collect();

    Ok(Json(FileScanResponse {
        filename,
        size,
        results,
    }))
}

/// Pull the `file` part out of the form, enforcing the upload limit.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(String, Bytes), ApiError> {
    const PARSE_FAILED: ApiError = ApiError::BadRequest("Failed to parse form");
    const NO_FILE: ApiError = ApiError::BadRequest("Failed to get file from form");

    let mut multipart = multipart.map_err(|_| PARSE_FAILED)?;

    while let Some(field) = multipart.next_field().await.map_err(|_| PARSE_FAILED)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string).ok_or(NO_FILE)?;
        let data = field.bytes().await.map_err(|_| PARSE_FAILED)?;
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::BadRequest("File exceeds the 10 MiB upload limit"));
        }
        return Ok((filename, data));
    }

    Err(NO_FILE)
}

// =============================================================================
// Fallbacks
// =============================================================================

async fn index() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/static/")])
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 page not found")
}
