//! Upstream Transport Module
//!
//! The raw transport seam: a trait for the login and data calls, a reqwest
//! implementation against the real upstream, and a fixture-serving mock
//! selected by configuration. Callers above this layer never see reqwest;
//! they get structured status/body pairs or classified network errors.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::cache::Params;
use crate::config::Config;
use crate::error::{ProxyError, Result};

// == Upstream Response ==
/// Structured result of a raw upstream call.
///
/// Non-2xx statuses are returned here rather than as errors so the caller
/// can classify them (401 triggers the retry path, other failures do not).
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed response body, `Value::Null` if the body was not JSON
    pub body: Value,
}

impl UpstreamResponse {
    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

// == Transport Trait ==
/// Raw transport to the upstream API.
///
/// Implementations return `ProxyError::Network` for transport-level
/// failures and structured responses for everything the upstream actually
/// answered.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the upstream login call with the given credentials.
    async fn login(&self, username: &str, password: &str) -> Result<UpstreamResponse>;

    /// Performs an authenticated data call against the given endpoint.
    async fn request(
        &self,
        endpoint: &str,
        params: &Params,
        bearer: &str,
    ) -> Result<UpstreamResponse>;
}

// == HTTP Transport ==
/// Real transport backed by a reqwest client.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Option<String>,
    login_path: String,
}

impl HttpTransport {
    /// Creates a transport from the proxy configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config
                .upstream_base_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
            login_path: config.login_path.clone(),
        }
    }

    fn base_url(&self) -> Result<&str> {
        self.base_url.as_deref().ok_or_else(|| {
            ProxyError::RequestFailed("upstream base URL is not configured".to_string())
        })
    }

    async fn read_response(response: reqwest::Response) -> UpstreamResponse {
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        UpstreamResponse { status, body }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn login(&self, username: &str, password: &str) -> Result<UpstreamResponse> {
        let url = format!("{}{}", self.base_url()?, self.login_path);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(classify_transport_error)?;

        Ok(Self::read_response(response).await)
    }

    async fn request(
        &self,
        endpoint: &str,
        params: &Params,
        bearer: &str,
    ) -> Result<UpstreamResponse> {
        let url = format!("{}/{}", self.base_url()?, endpoint.trim_matches('/'));

        let query: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_str(), v)))
            .collect();

        let response = self
            .client
            .get(&url)
            .query(&query)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(classify_transport_error)?;

        Ok(Self::read_response(response).await)
    }
}

/// Maps reqwest failures to the network error class.
fn classify_transport_error(err: reqwest::Error) -> ProxyError {
    if err.is_timeout() {
        ProxyError::Network(format!("upstream call timed out: {}", err))
    } else if err.is_connect() {
        ProxyError::Network(format!("could not connect to upstream: {}", err))
    } else {
        ProxyError::Network(format!("upstream transport failure: {}", err))
    }
}

// == Mock Transport ==
/// Fixture-serving transport selected by `USE_MOCK_UPSTREAM`.
///
/// Accepts any credentials and answers search/detail endpoints with a small
/// deterministic set of drug records, using the envelope shapes the real
/// upstream is known to use.
#[derive(Debug, Default)]
pub struct MockTransport;

impl MockTransport {
    pub fn new() -> Self {
        Self
    }

    fn fixtures() -> Vec<Value> {
        vec![
            json!({
                "id": "MED-0001",
                "name": "Paracetamol 500mg",
                "activeIngredient": "paracetamol",
                "strength": "500 mg",
                "form": "tablet",
                "registrationNumber": "REG-10233",
            }),
            json!({
                "id": "MED-0002",
                "name": "Ibuprofen 200mg",
                "activeIngredient": "ibuprofen",
                "strength": "200 mg",
                "form": "capsule",
                "registrationNumber": "REG-20417",
            }),
            json!({
                "id": "MED-0003",
                "name": "Amoxicillin 250mg",
                "activeIngredient": "amoxicillin",
                "strength": "250 mg",
                "form": "suspension",
                "registrationNumber": "REG-30852",
            }),
        ]
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn login(&self, _username: &str, _password: &str) -> Result<UpstreamResponse> {
        Ok(UpstreamResponse {
            status: 200,
            body: json!({ "token": "mock-token", "expiresIn": 3600 }),
        })
    }

    async fn request(
        &self,
        endpoint: &str,
        params: &Params,
        _bearer: &str,
    ) -> Result<UpstreamResponse> {
        let fixtures = Self::fixtures();

        if endpoint.contains("detail") {
            let id = params
                .get("id")
                .and_then(|v| v.as_deref())
                .unwrap_or_default();
            let found = fixtures
                .into_iter()
                .find(|drug| drug["id"].as_str() == Some(id));

            return Ok(match found {
                Some(drug) => UpstreamResponse {
                    status: 200,
                    body: json!({ "data": drug }),
                },
                None => UpstreamResponse {
                    status: 404,
                    body: json!({ "error": "not found" }),
                },
            });
        }

        let query = params
            .get("query")
            .and_then(|v| v.as_deref())
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let results: Vec<Value> = fixtures
            .into_iter()
            .filter(|drug| {
                drug["name"]
                    .as_str()
                    .map(|name| name.to_lowercase().contains(&query))
                    .unwrap_or(false)
            })
            .collect();

        Ok(UpstreamResponse {
            status: 200,
            body: json!({ "results": results }),
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_response_classification() {
        let ok = UpstreamResponse { status: 200, body: Value::Null };
        assert!(ok.is_success());
        assert!(!ok.is_unauthorized());

        let unauthorized = UpstreamResponse { status: 401, body: Value::Null };
        assert!(!unauthorized.is_success());
        assert!(unauthorized.is_unauthorized());

        let failed = UpstreamResponse { status: 502, body: Value::Null };
        assert!(!failed.is_success());
        assert!(!failed.is_unauthorized());
    }

    #[test]
    fn test_http_transport_requires_base_url() {
        let transport = HttpTransport::new(&Config::default());
        let err = transport.base_url().unwrap_err();
        assert_eq!(err.kind(), "REQUEST_FAILED");
    }

    #[tokio::test]
    async fn test_mock_login_issues_token() {
        let transport = MockTransport::new();
        let response = transport.login("anyone", "anything").await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.body["token"].as_str(), Some("mock-token"));
        assert_eq!(response.body["expiresIn"].as_u64(), Some(3600));
    }

    #[tokio::test]
    async fn test_mock_search_filters_by_query() {
        let transport = MockTransport::new();

        let mut params = Params::new();
        params.insert("query".to_string(), Some("ibuprofen".to_string()));

        let response = transport.request("drugs/search", &params, "t").await.unwrap();
        let results = response.body["results"].as_array().unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["name"].as_str(), Some("Ibuprofen 200mg"));
    }

    #[tokio::test]
    async fn test_mock_detail_wraps_in_data_envelope() {
        let transport = MockTransport::new();

        let mut params = Params::new();
        params.insert("id".to_string(), Some("MED-0001".to_string()));

        let response = transport.request("drugs/detail", &params, "t").await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.body["data"]["id"].as_str(), Some("MED-0001"));
    }

    #[tokio::test]
    async fn test_mock_detail_unknown_id() {
        let transport = MockTransport::new();

        let mut params = Params::new();
        params.insert("id".to_string(), Some("MED-9999".to_string()));

        let response = transport.request("drugs/detail", &params, "t").await.unwrap();
        assert_eq!(response.status, 404);
    }
}
