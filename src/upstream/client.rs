//! Cached Request Wrapper Module
//!
//! Composes the token manager, the response cache, and the raw transport.
//! Requests are keyed deterministically from endpoint and parameters; hits
//! come straight from the cache with provenance metadata, misses perform an
//! authenticated upstream call with a single 401-triggered token refresh.
//! Cache population is single-flight per key: concurrent misses for the
//! same key serialize on a per-key lock and followers re-check the cache
//! before calling upstream.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::cache::{generate_key, CacheStats, Params, TtlCache};
use crate::error::{ProxyError, Result};
use crate::upstream::{TokenManager, Transport};

// == Cached Payload ==
/// An upstream payload plus its cache provenance.
#[derive(Debug, Clone)]
pub struct CachedPayload {
    /// Whether the payload came from the cache
    pub hit: bool,
    /// The cache key the payload lives under
    pub key: String,
    /// Remaining TTL on a hit, the stored TTL on a miss (seconds)
    pub ttl: u64,
    /// The payload itself
    pub data: Value,
}

// == Upstream Client ==
/// The cached request wrapper around the upstream API.
pub struct UpstreamClient {
    transport: Arc<dyn Transport>,
    tokens: TokenManager,
    cache: Arc<RwLock<TtlCache>>,
    /// Per-key locks for in-flight cache population
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl UpstreamClient {
    // == Constructor ==
    pub fn new(
        transport: Arc<dyn Transport>,
        tokens: TokenManager,
        max_cache_entries: usize,
    ) -> Self {
        Self {
            transport,
            tokens,
            cache: Arc::new(RwLock::new(TtlCache::new(max_cache_entries))),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    // == Cached Request ==
    /// Returns the payload for `endpoint` + `params`, from the cache when
    /// possible, otherwise from an authenticated upstream call whose
    /// well-formed result is stored for `ttl_seconds`.
    ///
    /// Upstream results carrying an `error` field are returned but never
    /// cached; classified errors propagate uncached.
    pub async fn cached_request(
        &self,
        endpoint: &str,
        params: &Params,
        ttl_seconds: u64,
    ) -> Result<CachedPayload> {
        let key = generate_key(&format!("source_{}", normalize_endpoint(endpoint)), params);

        if let Some(payload) = self.lookup(&key).await {
            debug!(key = %key, "cache hit");
            return Ok(payload);
        }

        let key_lock = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        let outcome = {
            let _populate = key_lock.lock().await;

            // A concurrent leader may have populated the key while we
            // waited on the lock
            match self.recheck(&key).await {
                Some(payload) => {
                    debug!(key = %key, "cache hit after awaiting in-flight request");
                    Ok(payload)
                }
                None => {
                    debug!(key = %key, endpoint = %endpoint, "cache miss, calling upstream");
                    match self.raw_request(endpoint, params).await {
                        Ok(data) => {
                            if data.get("error").is_none() {
                                let mut cache = self.cache.write().await;
                                cache.set(key.clone(), data.clone(), ttl_seconds);
                            }

                            Ok(CachedPayload {
                                hit: false,
                                key: key.clone(),
                                ttl: ttl_seconds,
                                data,
                            })
                        }
                        Err(err) => Err(err),
                    }
                }
            }
        };

        // Drop the registry entry once nobody else holds it; a waiter that
        // cloned the lock between this check and the remove still works on
        // its own Arc
        {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(lock) = in_flight.get(&key) {
                if Arc::strong_count(lock) <= 2 {
                    in_flight.remove(&key);
                }
            }
        }

        outcome
    }

    // == Raw Request ==
    /// Authenticated upstream call with exactly one 401-triggered retry.
    ///
    /// A 401 clears the token and retries once with a fresh login; a second
    /// consecutive 401 is terminal. Other non-2xx statuses fail immediately
    /// as `REQUEST_FAILED`; transport and token errors propagate already
    /// classified.
    async fn raw_request(&self, endpoint: &str, params: &Params) -> Result<Value> {
        let mut retried = false;

        loop {
            let token = self.tokens.get_token().await?;
            let response = self.transport.request(endpoint, params, &token).await?;

            if response.is_success() {
                return Ok(response.body);
            }

            if response.is_unauthorized() {
                self.tokens.invalidate().await;
                if retried {
                    return Err(ProxyError::AuthFailed(
                        "upstream rejected a freshly issued token".to_string(),
                    ));
                }
                warn!(endpoint = %endpoint, "upstream returned 401, refreshing token and retrying once");
                retried = true;
                continue;
            }

            return Err(ProxyError::RequestFailed(format!(
                "upstream responded with status {} for {}",
                response.status, endpoint
            )));
        }
    }

    // == Lookup ==
    async fn lookup(&self, key: &str) -> Option<CachedPayload> {
        let mut cache = self.cache.write().await;
        let data = cache.get(key)?;
        let ttl = cache.remaining_ttl(key);

        Some(CachedPayload {
            hit: true,
            key: key.to_string(),
            ttl,
            data,
        })
    }

    // == Recheck ==
    /// Like `lookup`, but probes with `has` first so a still-absent key does
    /// not count a second miss for the same logical request.
    async fn recheck(&self, key: &str) -> Option<CachedPayload> {
        let mut cache = self.cache.write().await;
        if !cache.has(key) {
            return None;
        }

        let data = cache.get(key)?;
        let ttl = cache.remaining_ttl(key);

        Some(CachedPayload {
            hit: true,
            key: key.to_string(),
            ttl,
            data,
        })
    }

    // == Introspection ==
    /// Current response-cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Whether an upstream token is currently cached.
    pub async fn has_token(&self) -> bool {
        self.tokens.has_token().await
    }

    /// Empties the response cache. Lifetime counters are kept.
    pub async fn clear_response_cache(&self) {
        self.cache.write().await.clear();
    }

    /// Drops the cached upstream token.
    pub async fn clear_token_cache(&self) {
        self.tokens.invalidate().await;
    }

    /// Shared handle to the response cache, used by the background sweep.
    pub fn cache(&self) -> Arc<RwLock<TtlCache>> {
        self.cache.clone()
    }
}

// == Endpoint Normalization ==
/// Lowercases, trims, and flattens an endpoint path into a key segment.
fn normalize_endpoint(endpoint: &str) -> String {
    endpoint
        .trim()
        .trim_matches('/')
        .to_lowercase()
        .replace('/', "_")
}
