//! Request and Response models for the proxy API
//!
//! This module defines the DTOs used for serializing/deserializing HTTP
//! request and response bodies, plus the defensive envelope unwrapping for
//! upstream payloads.

pub mod envelope;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use envelope::Envelope;
pub use requests::SearchQuery;
pub use responses::{
    CacheInfo, ClearResponse, DrugDataResponse, ErrorResponse, HealthResponse, StatsResponse,
};
