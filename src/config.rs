//! Configuration Module
//!
//! Loads the front-end server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which cache backend the server runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Recency-ordered eviction
    Lru,
    /// Bounded map with optional expiry
    Ttl,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(CacheBackend::Lru),
            "ttl" => Ok(CacheBackend::Ttl),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache backend to serve
    pub backend: CacheBackend,
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Entry lifetime in seconds for the TTL backend (0 = never expire)
    pub ttl_secs: u64,
    /// Snapshot file for the TTL backend
    pub snapshot_path: Option<PathBuf>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `lru` or `ttl` (default: lru)
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 100)
    /// - `CACHE_TTL` - Entry TTL in seconds, ttl backend only (default: 0)
    /// - `SNAPSHOT_PATH` - Snapshot file, ttl backend only (default: unset)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.backend),
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            ttl_secs: parse_var("CACHE_TTL").unwrap_or(defaults.ttl_secs),
            snapshot_path: env::var_os("SNAPSHOT_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Returns the configured TTL as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Lru,
            capacity: 100,
            ttl_secs: 0,
            snapshot_path: None,
            server_port: 3000,
        }
    }
}
