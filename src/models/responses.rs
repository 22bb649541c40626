//! Response DTOs for the proxy API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::models::Envelope;
use crate::upstream::CachedPayload;

/// Cache provenance attached to every proxied payload.
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfo {
    /// Whether the payload was served from the cache
    pub hit: bool,
    /// The cache key the payload lives under
    pub key: String,
    /// Remaining TTL in seconds
    pub ttl: u64,
}

/// Response body for the drug search and detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DrugDataResponse {
    /// The unwrapped upstream payload
    pub data: Value,
    /// Cache provenance
    pub cache: CacheInfo,
}

impl DrugDataResponse {
    /// Builds a response from a cached payload, unwrapping whichever
    /// envelope the upstream used.
    pub fn new(payload: CachedPayload) -> Self {
        let CachedPayload { hit, key, ttl, data } = payload;
        Self {
            data: Envelope::unwrap_value(data),
            cache: CacheInfo { hit, key, ttl },
        }
    }
}

/// Response body for the stats endpoint (GET /api/cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of store operations
    pub sets: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Whether an upstream token is currently cached
    pub token_cached: bool,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics.
    pub fn new(stats: CacheStats, token_cached: bool) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            hits: stats.hits,
            misses: stats.misses,
            sets: stats.sets,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            hit_rate,
            token_cached,
        }
    }
}

/// Response body for the cache/token clear endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
}

impl ClearResponse {
    /// Creates a new ClearResponse naming what was cleared.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            message: format!("{} cleared successfully", target.into()),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Stable error class discriminant
    pub kind: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse.
    pub fn new(error: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: kind.into(),
        }
    }
}
