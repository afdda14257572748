//! Single-call HTTP transport.
//!
//! DESIGN
//! ======
//! `Transport` is the only seam between the dashboard and the network. One
//! call builds one request under the fixed API root, maps non-2xx statuses to
//! `TransportError::Status`, and parses the body. The transport never retries;
//! retry and surfacing policy belong to the caller (sync loop or action).
//!
//! Bodies: 204 and empty bodies yield `None`. Anything else is parsed as JSON,
//! falling back to a JSON string for plain-text bodies such as the health probe.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::DashboardConfig;

/// HTTP verbs used by the backend surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request relative to the API root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new() }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// Failure of a single transport call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("{method} {path}: HTTP {status}")]
    Status { method: Method, path: String, status: u16 },

    /// The request never produced a response (connect, timeout, body read).
    #[error("{method} {path}: request failed: {message}")]
    Network { method: Method, path: String, message: String },

    /// The body did not match the expected shape.
    #[error("{path}: response decode failed: {message}")]
    Decode { path: String, message: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl TransportError {
    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// One request in, one parsed body out.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Issue `request` and return the parsed body, or `None` for no content.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network failure or a non-2xx status.
    async fn call(&self, request: ApiRequest) -> Result<Option<Value>, TransportError>;
}

/// Issue `request` and decode the body into `T`.
///
/// # Errors
///
/// Propagates transport failures; an empty or mismatched body is a
/// [`TransportError::Decode`].
pub async fn call_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: ApiRequest,
) -> Result<T, TransportError> {
    let path = request.path.clone();
    let Some(body) = transport.call(request).await? else {
        return Err(TransportError::Decode { path, message: "empty body".to_owned() });
    };
    serde_json::from_value(body).map_err(|e| TransportError::Decode { path, message: e.to_string() })
}

/// Issue `request` and discard whatever body comes back.
///
/// # Errors
///
/// Propagates transport failures.
pub async fn call_unit(transport: &dyn Transport, request: ApiRequest) -> Result<(), TransportError> {
    transport.call(request).await.map(|_| ())
}

pub(crate) fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned())))
}

/// `reqwest`-backed transport rooted at `base_url` + `api_root`.
pub struct HttpTransport {
    http: reqwest::Client,
    root: String,
}

impl HttpTransport {
    /// Build a transport from dashboard configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self { http, root: config.api_url() })
    }

    /// Full URL for a path relative to the API root.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.root, path)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn call(&self, request: ApiRequest) -> Result<Option<Value>, TransportError> {
        let ApiRequest { method, path, query } = request;
        tracing::debug!(%method, %path, "api call");

        let network = |e: reqwest::Error| TransportError::Network {
            method,
            path: path.clone(),
            message: e.to_string(),
        };

        let mut builder = self.http.request(method.into(), self.url(&path));
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        let response = builder.send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { method, path: path.clone(), status: status.as_u16() });
        }
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = response.text().await.map_err(network)?;
        Ok(parse_body(&text))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use tokio::sync::Semaphore;

    use super::*;

    /// Canned reply for a mocked route.
    #[derive(Clone, Debug)]
    pub enum Reply {
        Json(Value),
        Empty,
        Status(u16),
    }

    #[derive(Default)]
    struct Routes {
        replies: HashMap<(Method, String), Reply>,
        gates: HashMap<(Method, String), Arc<Semaphore>>,
        calls: Vec<ApiRequest>,
    }

    /// In-memory backend. Unknown routes answer 404. A gated route holds each
    /// call until the test adds a permit to its semaphore.
    #[derive(Default)]
    pub struct MockTransport {
        routes: Mutex<Routes>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn on(&self, method: Method, path: &str, reply: Reply) {
            self.routes.lock().unwrap().replies.insert((method, path.to_owned()), reply);
        }

        pub fn on_json(&self, method: Method, path: &str, value: Value) {
            self.on(method, path, Reply::Json(value));
        }

        pub fn gate(&self, method: Method, path: &str) -> Arc<Semaphore> {
            let gate = Arc::new(Semaphore::new(0));
            self.routes.lock().unwrap().gates.insert((method, path.to_owned()), gate.clone());
            gate
        }

        pub fn calls(&self) -> Vec<ApiRequest> {
            self.routes.lock().unwrap().calls.clone()
        }

        pub fn count(&self, method: Method, path: &str) -> usize {
            self.routes
                .lock()
                .unwrap()
                .calls
                .iter()
                .filter(|c| c.method == method && c.path == path)
                .count()
        }
    }

    #[async_trait::async_trait]
    impl Transport for MockTransport {
        async fn call(&self, request: ApiRequest) -> Result<Option<Value>, TransportError> {
            let key = (request.method, request.path.clone());
            let gate = {
                let mut routes = self.routes.lock().unwrap();
                routes.calls.push(request.clone());
                routes.gates.get(&key).cloned()
            };
            if let Some(gate) = gate {
                gate.acquire().await.unwrap().forget();
            }
            let reply = self.routes.lock().unwrap().replies.get(&key).cloned();
            match reply {
                Some(Reply::Json(value)) => Ok(Some(value)),
                Some(Reply::Empty) => Ok(None),
                Some(Reply::Status(status)) => {
                    Err(TransportError::Status { method: request.method, path: request.path, status })
                }
                None => Err(TransportError::Status { method: request.method, path: request.path, status: 404 }),
            }
        }
    }
}
