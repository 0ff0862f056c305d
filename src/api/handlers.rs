//! Endpoint handlers and the state they share.
//!
//! Each handler maps a [`CacheError`] straight to its HTTP status.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::{Cache, CacheStats, LruCache, TtlCache, TtlCacheOptions};
use crate::config::{CacheBackend, Config};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse,
    StatsResponse,
};
use crate::snapshot::FileSnapshotStore;

/// The cache instance served by the API.
#[derive(Clone)]
pub enum Backend {
    Lru(Arc<LruCache<String, String>>),
    Ttl(Arc<TtlCache<String, String>>),
}

impl Backend {
    /// Short backend name used in stats output.
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Lru(_) => "lru",
            Backend::Ttl(_) => "ttl",
        }
    }

    /// Returns the backend behind the shared cache contract.
    pub fn cache(&self) -> &dyn Cache<String, String> {
        match self {
            Backend::Lru(cache) => &**cache,
            Backend::Ttl(cache) => &**cache,
        }
    }

    pub fn capacity(&self) -> usize {
        match self {
            Backend::Lru(cache) => cache.capacity(),
            Backend::Ttl(cache) => cache.capacity(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        match self {
            Backend::Lru(cache) => cache.stats(),
            Backend::Ttl(cache) => cache.stats(),
        }
    }
}

/// Application state shared across all handlers.
///
/// The caches lock internally, so the state is cloned freely.
#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
}

impl AppState {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// State serving an LRU cache of the given capacity.
    pub fn lru(capacity: usize) -> Self {
        Self::new(Backend::Lru(Arc::new(LruCache::new(capacity))))
    }

    /// State serving a TTL cache built from `options`.
    pub fn ttl(options: TtlCacheOptions) -> Self {
        Self::new(Backend::Ttl(TtlCache::new(options)))
    }

    /// Builds the backend named by `config`, attaching a file snapshot store
    /// to a TTL backend when a path is configured.
    pub fn from_config(config: &Config) -> Self {
        match config.backend {
            CacheBackend::Lru => Self::lru(config.capacity),
            CacheBackend::Ttl => {
                let mut options = TtlCacheOptions::new(config.capacity, config.ttl());
                if let Some(path) = &config.snapshot_path {
                    info!("Using snapshot file {}", path.display());
                    options = options.with_store(Arc::new(FileSnapshotStore::new(path)));
                }
                Self::ttl(options)
            }
        }
    }
}

pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.backend.cache().set(req.key.clone(), req.value)?;

    Ok(Json(SetResponse::new(req.key)))
}

pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state.backend.cache().get(&key)?;

    Ok(Json(GetResponse::new(key, value)))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.backend.cache().delete(&key)?;

    Ok(Json(DeleteResponse::new(key)))
}

/// A TTL backend with a snapshot file writes the snapshot first; a failed
/// write leaves the contents in place and answers 500.
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    state.backend.cache().clear()?;

    Ok(Json(ClearResponse::new()))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let backend = &state.backend;

    Json(StatsResponse::new(
        backend.name(),
        backend.capacity(),
        &backend.stats(),
    ))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
