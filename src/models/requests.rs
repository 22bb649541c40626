//! Request DTOs for the proxy API
//!
//! Defines the structure of incoming query parameters.

use serde::Deserialize;

use crate::cache::Params;

/// Query parameters for the drug search endpoint (GET /api/drugs/search)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Free-text search term
    pub query: String,
    /// Optional page number
    #[serde(default)]
    pub page: Option<u32>,
}

impl SearchQuery {
    /// Validates the query parameters.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.query.trim().is_empty() {
            return Some("Query cannot be empty".to_string());
        }
        if self.query.len() > 256 {
            return Some("Query exceeds maximum length of 256 characters".to_string());
        }
        None
    }

    /// Converts the query into upstream request parameters.
    pub fn into_params(self) -> Params {
        let mut params = Params::new();
        params.insert("query".to_string(), Some(self.query));
        params.insert("page".to_string(), self.page.map(|p| p.to_string()));
        params
    }
}
