//! Error types for the proxy
//!
//! Provides unified error handling using thiserror. Every error carries a
//! stable kind discriminant so callers can map classes of failure to
//! distinct external status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Proxy Error Enum ==
/// Unified error type for the proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Missing credentials or upstream login rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Transport-level failure (DNS, connection, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream responded with a non-2xx, non-401 status, or base
    /// configuration is missing
    #[error("Upstream request failed: {0}")]
    RequestFailed(String),

    /// Invalid request data from the caller
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    // == Kind ==
    /// Stable discriminant string for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::AuthFailed(_) => "AUTH_FAILED",
            ProxyError::Network(_) => "NETWORK_ERROR",
            ProxyError::RequestFailed(_) => "REQUEST_FAILED",
            ProxyError::InvalidRequest(_) => "INVALID_REQUEST",
            ProxyError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ProxyError::AuthFailed(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ProxyError::Network(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ProxyError::RequestFailed(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            ProxyError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ProxyError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
