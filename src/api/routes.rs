//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, clear_token_handler, drug_detail_handler, health_handler,
    search_drugs_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/drugs/search` - Search the drug database
/// - `GET /api/drugs/:id` - Fetch a single drug record
/// - `GET /api/cache/stats` - Get cache statistics
/// - `POST /api/cache/clear` - Empty the response cache
/// - `POST /api/token/clear` - Drop the cached upstream token
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/api/drugs/search", get(search_drugs_handler))
        .route("/api/drugs/:id", get(drug_detail_handler))
        .route("/api/cache/stats", get(stats_handler))
        .route("/api/cache/clear", post(clear_cache_handler))
        .route("/api/token/clear", post(clear_token_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
