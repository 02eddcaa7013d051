//! HTTP request handlers for the tile server.
//!
//! # Endpoints
//!
//! - `GET /tiles/{z}/{y}/{x}.png` - Serve a tile
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::TileError;
use crate::pyramid::TileCoord;
use crate::tile::TileSource;

/// Default Cache-Control max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the tile source.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: TileSource> {
    /// Where tiles are read from
    pub source: Arc<S>,

    /// Cache-Control max-age in seconds for tile responses
    pub cache_max_age: u32,
}

impl<S: TileSource> AppState<S> {
    /// Create a new application state with the default cache max-age.
    pub fn new(source: S) -> Self {
        Self::with_cache_max_age(source, DEFAULT_CACHE_MAX_AGE)
    }

    /// Create a new application state with custom cache max-age.
    pub fn with_cache_max_age(source: S, cache_max_age: u32) -> Self {
        Self {
            source: Arc::new(source),
            cache_max_age,
        }
    }
}

impl<S: TileSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Path parameters for tile requests.
///
/// Extracted from: `/tiles/{z}/{y}/{filename}` where filename is `{x}.png`.
/// Kept as strings so that malformed values become a 404 rather than an
/// extractor rejection.
#[derive(Debug, Deserialize)]
pub struct TilePathParams {
    /// Zoom level, may be negative
    pub z: String,

    /// Tile row
    pub y: String,

    /// Tile column with the `.png` extension (e.g. "3.png")
    pub filename: String,
}

impl TilePathParams {
    /// The tile these parameters name, if they name one at all.
    pub fn coord(&self) -> Option<TileCoord> {
        TileCoord::from_segments(&self.z, &self.y, &self.filename)
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for server-side failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "io_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert TileError to HTTP response.
///
/// Missing tiles never reach this path; they are answered with a bare 404.
impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            TileError::Io { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                self.to_string(),
            ),
        };

        error!(
            error_type = error_type,
            status = status.as_u16(),
            "Server error: {}",
            message
        );

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Serve one tile.
///
/// Anything that does not resolve to an existing tile (a non-integer zoom,
/// a negative index, a missing file) is answered with 404 and no body.
pub async fn tile_handler<S: TileSource>(
    State(state): State<AppState<S>>,
    Path(params): Path<TilePathParams>,
) -> Result<Response, TileError> {
    let Some(coord) = params.coord() else {
        debug!(
            z = %params.z,
            y = %params.y,
            filename = %params.filename,
            "Request does not name a tile"
        );
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let Some(data) = state.source.read_tile(coord).await? else {
        debug!(tile = %coord, "Tile not found");
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CACHE_CONTROL,
                format!("public, max-age={}", state.cache_max_age),
            ),
        ],
        data,
    )
        .into_response())
}

/// Health check endpoint.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
