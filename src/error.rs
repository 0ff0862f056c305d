//! Error types for the cache library
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::snapshot::SnapshotError;

// == Cache Error Enum ==
/// Unified error type for every cache backend.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not present in the cache
    #[error("key {0} not found")]
    NotFound(String),

    /// Bounded cache is at capacity and the key is new
    #[error("cache is full")]
    CacheFull,

    /// Snapshot store rejected the dump issued by `clear`
    #[error("snapshot persistence failed: {0}")]
    Persistence(#[from] SnapshotError),

    /// Current contents could not be encoded as a snapshot
    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Invalid request data (HTTP front-end only)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Builds a `NotFound` error naming the given key.
    pub fn not_found<K: std::fmt::Debug>(key: &K) -> Self {
        CacheError::NotFound(format!("{:?}", key))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::CacheFull => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Persistence(_) | CacheError::Snapshot(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
