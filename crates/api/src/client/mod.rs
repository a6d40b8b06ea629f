//! HTTP client for the Portana backend.
//!
//! [`ApiClient`] is a configured `reqwest::Client` plus the interceptors
//! installed when it was built. It is created through a [`ClientProvider`],
//! which makes sure one lifecycle shares one instance.

mod interceptor;
mod provider;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use interceptor::{BearerAuthInterceptor, RequestInterceptor};
pub use provider::{global_provider, install_global_provider, shared_client, ClientProvider};

use crate::config::ApiConfig;
use crate::endpoints::Endpoint;
use crate::error::{ApiError, Result};

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Configured HTTP client. GET only, JSON only, no retry.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

impl ApiClient {
    /// Create a client without interceptors.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be initialized.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::config(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            timeout: config.request_timeout(),
            interceptors: Vec::new(),
        })
    }

    /// Install an interceptor. Only used while the client is being built.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Fetch an endpoint and unwrap its payload.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        subject: Option<&str>,
    ) -> Result<T> {
        let path = endpoint.resolve(subject)?;
        let body: Value = self.get(&path).await?;
        unwrap_envelope(&path, endpoint.field, body)
    }

    /// Make a GET request and parse the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[ApiClient] GET {}", url);

        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .build()
            .map_err(|e| ApiError::invalid_request(format!("Invalid request URL {}: {}", url, e)))?;

        for interceptor in &self.interceptors {
            interceptor.intercept(&mut request);
        }

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        self.parse_response(&url, response).await
    }

    /// Parse an HTTP response, handling errors appropriately.
    async fn parse_response<T: DeserializeOwned>(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        if !status.is_success() {
            debug!("[ApiClient] {} returned {}", url, status);
            // Prefer the backend's own error message when it sends one
            if let Ok(err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                let detail = err.detail.map(|d| match d {
                    Value::String(s) => s,
                    other => other.to_string(),
                });
                if let Some(msg) = detail.or(err.message).or(err.error) {
                    return Err(ApiError::status(status.as_u16(), &msg));
                }
            }
            return Err(ApiError::status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(ApiError::from)
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout_ms(),
            }
        } else {
            ApiError::Transport(err)
        }
    }
}

/// Take the payload out of a response body.
///
/// With a field name, the body must be an object holding that field. Without
/// one, the whole body is the payload.
fn unwrap_envelope<T: DeserializeOwned>(path: &str, field: Option<&str>, body: Value) -> Result<T> {
    let payload = match (field, body) {
        (None, body) => body,
        (Some(field), Value::Object(mut map)) => map.remove(field).ok_or_else(|| ApiError::Envelope {
            path: path.to_string(),
            message: format!("missing field '{}'", field),
        })?,
        (Some(field), _) => {
            return Err(ApiError::Envelope {
                path: path.to_string(),
                message: format!("expected an object with field '{}'", field),
            })
        }
    };

    serde_json::from_value(payload).map_err(|e| ApiError::Envelope {
        path: path.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PositionSummary;
    use serde_json::json;

    #[test]
    fn unwraps_named_field() {
        let body = json!({"positions": [{"symbol": "AAPL", "quantity": 10, "total_cost": 1500}]});
        let positions: Vec<PositionSummary> =
            unwrap_envelope("/api/users/42/positions", Some("positions"), body).unwrap();
        assert_eq!(
            positions,
            vec![PositionSummary {
                symbol: "AAPL".to_string(),
                quantity: 10.0,
                total_cost: 1500.0,
            }]
        );
    }

    #[test]
    fn whole_body_when_no_field() {
        let body = json!([1, 2, 3]);
        let values: Vec<u32> = unwrap_envelope("/x", None, body).unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn renamed_or_malformed_fields_fail() {
        let renamed = json!({"position": []});
        let err = unwrap_envelope::<Vec<PositionSummary>>("/p", Some("positions"), renamed)
            .unwrap_err();
        assert!(matches!(err, ApiError::Envelope { .. }));

        let null_payload = json!({"positions": null});
        let err = unwrap_envelope::<Vec<PositionSummary>>("/p", Some("positions"), null_payload)
            .unwrap_err();
        assert!(matches!(err, ApiError::Envelope { .. }));

        let not_object = json!([]);
        let err =
            unwrap_envelope::<Vec<PositionSummary>>("/p", Some("positions"), not_object).unwrap_err();
        assert!(matches!(err, ApiError::Envelope { .. }));
    }

    #[tokio::test]
    async fn unresponsive_backend_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and never answer
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = ApiConfig::new(&format!("http://{}", addr))
            .unwrap()
            .with_request_timeout(Duration::from_millis(200));
        let client = ApiClient::new(&config).unwrap();

        let started = std::time::Instant::now();
        let err = client.get::<Value>("/api/users").await.unwrap_err();
        assert!(err.is_timeout(), "unexpected error: {err:?}");
        assert!(started.elapsed() < Duration::from_secs(5));
        match err {
            ApiError::Timeout { timeout_ms, url } => {
                assert_eq!(timeout_ms, 200);
                assert!(url.ends_with("/api/users"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn timeout_millis_saturate() {
        let base = ApiConfig::new("http://localhost:8000").unwrap();
        assert_eq!(ApiClient::new(&base).unwrap().timeout_ms(), 8000);

        let huge = base.with_request_timeout(Duration::MAX);
        assert_eq!(ApiClient::new(&huge).unwrap().timeout_ms(), u64::MAX);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        // Bind then drop to get a port with nothing listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = ApiConfig::new(&format!("http://127.0.0.1:{}", port)).unwrap();
        let client = ApiClient::new(&config).unwrap();

        let err = client.get::<Value>("/api/users").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "unexpected error: {err:?}");
    }
}
