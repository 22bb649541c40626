//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint. Handlers are thin glue:
//! they validate input, call into the cached request wrapper, and shape the
//! result. All caching and auth behavior lives in `upstream`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::Params;
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{ClearResponse, DrugDataResponse, HealthResponse, SearchQuery, StatsResponse};
use crate::upstream::{HttpTransport, MockTransport, TokenManager, Transport, UpstreamClient};

/// Application state shared across all handlers.
///
/// The upstream client owns the token and response caches; handlers share
/// it through this state rather than importing process-wide globals, so
/// tests can run isolated instances side by side.
#[derive(Clone)]
pub struct AppState {
    /// The cached request wrapper around the upstream API
    pub client: Arc<UpstreamClient>,
    /// Proxy configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState from an already-built client.
    pub fn new(client: UpstreamClient, config: Config) -> Self {
        Self {
            client: Arc::new(client),
            config: Arc::new(config),
        }
    }

    /// Creates a new AppState from configuration, selecting the real or
    /// mock transport.
    pub fn from_config(config: &Config) -> Self {
        let transport: Arc<dyn Transport> = if config.use_mock_upstream {
            Arc::new(MockTransport::new())
        } else {
            Arc::new(HttpTransport::new(config))
        };

        // The mock accepts any credentials, so supply placeholders when
        // none are configured
        let (username, password) = if config.use_mock_upstream {
            (
                config
                    .upstream_username
                    .clone()
                    .or_else(|| Some("mock".to_string())),
                config
                    .upstream_password
                    .clone()
                    .or_else(|| Some("mock".to_string())),
            )
        } else {
            (
                config.upstream_username.clone(),
                config.upstream_password.clone(),
            )
        };

        let tokens = TokenManager::new(transport.clone(), username, password);
        let client = UpstreamClient::new(transport, tokens, config.max_cache_entries);

        Self::new(client, config.clone())
    }
}

/// Handler for GET /api/drugs/search
///
/// Forwards the search to the upstream through the response cache.
pub async fn search_drugs_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<DrugDataResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(ProxyError::InvalidRequest(error_msg));
    }

    let payload = state
        .client
        .cached_request("drugs/search", &query.into_params(), state.config.search_ttl)
        .await?;

    Ok(Json(DrugDataResponse::new(payload)))
}

/// Handler for GET /api/drugs/:id
///
/// Fetches a single drug record through the response cache.
pub async fn drug_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DrugDataResponse>> {
    if id.trim().is_empty() {
        return Err(ProxyError::InvalidRequest("Drug id cannot be empty".to_string()));
    }

    let mut params = Params::new();
    params.insert("id".to_string(), Some(id));

    let payload = state
        .client
        .cached_request("drugs/detail", &params, state.config.detail_ttl)
        .await?;

    Ok(Json(DrugDataResponse::new(payload)))
}

/// Handler for GET /api/cache/stats
///
/// Returns response-cache statistics plus token presence.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.client.stats().await;
    let token_cached = state.client.has_token().await;

    Json(StatsResponse::new(stats, token_cached))
}

/// Handler for POST /api/cache/clear
///
/// Empties the response cache. Lifetime counters are kept.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.client.clear_response_cache().await;
    Json(ClearResponse::new("Response cache"))
}

/// Handler for POST /api/token/clear
///
/// Drops the cached upstream token; the next request logs in again.
pub async fn clear_token_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.client.clear_token_cache().await;
    Json(ClearResponse::new("Token cache"))
}

/// Handler for GET /health
///
/// Returns health status of the proxy itself (not the upstream).
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
