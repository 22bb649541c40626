//! API Module
//!
//! HTTP handlers and routing for the proxy REST API.
//!
//! # Endpoints
//! - `GET /api/drugs/search` - Search the drug database
//! - `GET /api/drugs/:id` - Fetch a single drug record
//! - `GET /api/cache/stats` - Get cache statistics
//! - `POST /api/cache/clear` - Empty the response cache
//! - `POST /api/token/clear` - Drop the cached upstream token
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
