//! # API Client
//!
//! Shared HTTP client for the backend.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  client.sales().create(&request)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  endpoint(path)      base_url + "/sales"  (base path kept)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send()              bearer token, JSON body, configured timeout        │
//! │       │                                                                 │
//! │       ├── 2xx ──► decode T  (bare body or { "data": T })                │
//! │       │                                                                 │
//! │       └── 4xx/5xx ──► Rejected { status, message from body }            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::endpoints::{CouponsApi, LoyaltyApi, RegisterApi, SalesApi};
use crate::error::{ApiClientError, ApiResult};

/// Handle to the backend REST API.
///
/// Cheap to clone: clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Creates a client from a validated configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut base_url = Url::parse(&config.base_url)?;
        // Trailing slash so that joins append instead of replacing the last segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        debug!(base_url = %base_url, "API client created");

        Ok(ApiClient {
            http,
            base_url,
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Endpoint Groups
    // =========================================================================

    /// Returns the coupon endpoints.
    pub fn coupons(&self) -> CouponsApi {
        CouponsApi::new(self.clone())
    }

    /// Returns the loyalty endpoints.
    pub fn loyalty(&self) -> LoyaltyApi {
        LoyaltyApi::new(self.clone())
    }

    /// Returns the sale endpoints.
    pub fn sales(&self) -> SalesApi {
        SalesApi::new(self.clone())
    }

    /// Returns the register endpoints.
    pub fn register(&self) -> RegisterApi {
        RegisterApi::new(self.clone())
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub(crate) async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        let request = self.request(Method::GET, path)?;
        self.send(request, Method::GET, path).await
    }

    pub(crate) async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<R> {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request, Method::POST, path).await
    }

    pub(crate) async fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<R> {
        let request = self.request(Method::PUT, path)?.json(body);
        self.send(request, Method::PUT, path).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Resolves an endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        let mut request = self.http.request(method, url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: Method,
        path: &str,
    ) -> ApiResult<R> {
        debug!(%method, path, "API request");

        let response = request.send().await.map_err(|e| {
            error!(%method, path, error = %e, "API request failed");
            ApiClientError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiClientError::Timeout
            } else {
                ApiClientError::Network(e.to_string())
            }
        })?;

        if !status.is_success() {
            let message = rejection_message(status, &body);
            warn!(%method, path, status = status.as_u16(), message = %message, "API request rejected");
            return Err(ApiClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        decode_body(&body)
    }
}

/// Decodes a success body as `R`, unwrapping a `{ "data": ... }` envelope.
fn decode_body<R: DeserializeOwned>(body: &str) -> ApiResult<R> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body)?
    };

    match serde_json::from_value::<R>(value.clone()) {
        Ok(parsed) => Ok(parsed),
        Err(err) => match value {
            Value::Object(mut map) if map.contains_key("data") => {
                let data = map.remove("data").unwrap_or(Value::Null);
                Ok(serde_json::from_value(data)?)
            }
            _ => Err(err.into()),
        },
    }
}

/// Extracts the operator-facing message from an error body.
///
/// Looks at `message`, then `error`, then `detail`.
fn rejection_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["message", "error", "detail"]
            .iter()
            .find_map(|key| match value.get(*key) {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
                Some(Value::Null) | None => None,
                Some(Value::String(_)) => None,
                Some(other) => Some(other.to_string()),
            })
    });

    from_body.unwrap_or_else(|| {
        format!(
            "Request failed with status {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string()
    })
}
