//! Pharma Proxy - a caching proxy for an upstream pharmaceutical database
//!
//! Authenticates against the upstream with a cached bearer token, forwards
//! search/detail requests, and caches responses in a bounded TTL cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
