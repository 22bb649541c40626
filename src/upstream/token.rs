//! Token Manager Module
//!
//! Owns the single cached bearer token for the upstream API. A token is
//! considered valid only while the current time is at least one refresh
//! buffer short of its expiry; past that window the next caller performs a
//! login. The token state lives behind an async mutex that is held across
//! the refresh, so concurrent callers on a cold token trigger exactly one
//! login and share its result.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::current_timestamp_ms;
use crate::error::{ProxyError, Result};
use crate::upstream::Transport;

/// Safety margin subtracted from the token expiry when deciding freshness.
const REFRESH_BUFFER_MS: u64 = 60_000;

/// Token lifetime assumed when the upstream omits `expiresIn`.
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

// == Token ==
/// A bearer token and its absolute expiry.
#[derive(Debug, Clone)]
struct Token {
    value: String,
    expires_at: u64,
}

impl Token {
    fn is_fresh(&self) -> bool {
        current_timestamp_ms() < self.expires_at.saturating_sub(REFRESH_BUFFER_MS)
    }
}

// == Token Manager ==
/// Caches the upstream bearer token and refreshes it on demand.
pub struct TokenManager {
    transport: Arc<dyn Transport>,
    username: Option<String>,
    password: Option<String>,
    token: Mutex<Option<Token>>,
}

impl TokenManager {
    // == Constructor ==
    /// Creates a manager using the given transport and credentials.
    ///
    /// Missing credentials are not an error until a login is actually
    /// needed.
    pub fn new(
        transport: Arc<dyn Transport>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            transport,
            username,
            password,
            token: Mutex::new(None),
        }
    }

    // == Get Token ==
    /// Returns a valid bearer token, logging in to the upstream if the
    /// cached one is absent or inside the refresh buffer.
    ///
    /// On any failure the stored token is cleared and the error is
    /// classified: `AUTH_FAILED` for missing credentials or a rejected
    /// login, `NETWORK_ERROR` for transport failures.
    pub async fn get_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;

        if let Some(token) = guard.as_ref() {
            if token.is_fresh() {
                return Ok(token.value.clone());
            }
        }
        *guard = None;

        let (username, password) = match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => (username, password),
            _ => {
                return Err(ProxyError::AuthFailed(
                    "upstream credentials are not configured".to_string(),
                ))
            }
        };

        debug!("requesting new upstream token");
        let response = self.transport.login(username, password).await?;

        if !response.is_success() {
            return Err(ProxyError::AuthFailed(format!(
                "upstream login rejected with status {}",
                response.status
            )));
        }

        let value = response
            .body
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ProxyError::AuthFailed("upstream login response carries no token".to_string())
            })?
            .to_string();

        let expires_in = response
            .body
            .get("expiresIn")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        let expires_at = current_timestamp_ms() + expires_in * 1000;
        *guard = Some(Token {
            value: value.clone(),
            expires_at,
        });

        info!("upstream token refreshed, valid for {}s", expires_in);
        Ok(value)
    }

    // == Invalidate ==
    /// Clears the cached token. Called when the upstream rejects it.
    pub async fn invalidate(&self) {
        let mut guard = self.token.lock().await;
        if guard.take().is_some() {
            debug!("upstream token invalidated");
        }
    }

    // == Has Token ==
    /// Whether a token is currently cached (fresh or not).
    pub async fn has_token(&self) -> bool {
        self.token.lock().await.is_some()
    }
}
