//! Upstream Module
//!
//! Everything that talks to the upstream drug database: the pluggable raw
//! transport, the token manager, and the cached request wrapper that
//! composes the two with the response cache.

mod client;
mod token;
mod transport;

pub use client::{CachedPayload, UpstreamClient};
pub use token::TokenManager;
pub use transport::{HttpTransport, MockTransport, Transport, UpstreamResponse};
