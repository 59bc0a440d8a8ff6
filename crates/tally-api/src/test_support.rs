//! # Mock Backend
//!
//! In-process stand-in for the REST backend, used by tests in this crate
//! and (via the `test-util` feature) by the terminal app.
//!
//! ```text
//! ┌──────────────┐   HTTP    ┌───────────────────────────────────────────┐
//! │  ApiClient   │ ────────► │  axum router on 127.0.0.1:0/api/v1        │
//! └──────────────┘           │  ├── canned (status, JSON) per route      │
//!                            │  └── every request recorded for asserts   │
//!                            └───────────────────────────────────────────┘
//! ```
//!
//! Unregistered routes answer 404 with a `message` body.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::client::ApiClient;
use crate::config::ApiConfig;

const API_PREFIX: &str = "/api/v1";

/// A request the mock backend received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path relative to the API prefix, e.g. `/sales`.
    pub path: String,
    pub body: Value,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: u16,
    body: Value,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), CannedResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Running mock backend. Stops when dropped.
pub struct MockBackend {
    base_url: String,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Binds to an ephemeral local port and starts serving.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let router = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        MockBackend {
            base_url: format!("http://{}{}", addr, API_PREFIX),
            state,
            server,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Config pointing at this backend.
    pub fn config(&self) -> ApiConfig {
        ApiConfig::with_base_url(self.base_url.clone())
    }

    /// Client pointing at this backend.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("mock backend client")
    }

    /// Registers a canned response for `method path`.
    pub fn on(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.state
            .routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(
                (method.to_uppercase(), path.to_string()),
                CannedResponse { status, body },
            );
        self
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    /// Requests received for `method path`.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
            .collect()
    }

    /// Client whose every call fails at the transport level.
    pub async fn unreachable_client() -> ApiClient {
        // Grab a free port, then release it so nothing is listening there
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind probe listener");
        let addr = listener.local_addr().expect("probe address");
        drop(listener);

        ApiClient::new(&ApiConfig::with_base_url(format!(
            "http://{}{}",
            addr, API_PREFIX
        )))
        .expect("unreachable client")
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or(uri.path())
        .to_string();

    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state
        .requests
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(RecordedRequest {
            method: method.as_str().to_string(),
            path: path.clone(),
            body,
            authorization,
        });

    let canned = state
        .routes
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get(&(method.as_str().to_string(), path.clone()))
        .cloned();

    match canned {
        Some(canned) => {
            let status =
                StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(canned.body)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("No route for {} {}", method, path) })),
        )
            .into_response(),
    }
}
