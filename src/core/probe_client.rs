// src/core/probe_client.rs

use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::core::context::ScanContext;
use crate::core::errors::ProbeError;
use crate::core::models::{Category, ScanResult};

// --- Catalog Entries ---

/// The request body a remote endpoint expects, keyed by how it names the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// `{"target": ...}`
    Target,
    /// `{"target": ..., "port": ...}`
    TargetWithPort(u16),
    /// `{"domain": ...}`
    Domain,
    /// `{"url": ...}`
    Url,
    /// `{"query": ...}`
    Query,
    /// `{"domain": ..., "dorks": [...]}`
    DomainWithDorks,
}

impl Payload {
    pub fn body(&self, target: &str, dorks: &[String]) -> Value {
        match self {
            Payload::Target => json!({ "target": target }),
            Payload::TargetWithPort(port) => json!({ "target": target, "port": port }),
            Payload::Domain => json!({ "domain": target }),
            Payload::Url => json!({ "url": target }),
            Payload::Query => json!({ "query": target }),
            Payload::DomainWithDorks => json!({ "domain": target, "dorks": dorks }),
        }
    }
}

/// One entry of a category catalog: the scan identifier, the name used in result
/// messages, and the payload shape of its endpoint (`<category>/<id>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub payload: Payload,
}

// --- Transport ---

/// The wire boundary to the remote scanning service.
///
/// Implementations issue exactly one request per call and return the decoded JSON
/// body. A body carrying `"status": "error"` is returned as-is; interpreting it is
/// the client's job.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, path: &str, body: &Value) -> Result<Value, ProbeError>;
}

/// HTTP transport over a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url, user_agent: &str, connect_timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client for the scanning service.");
                ProbeError::Transport(e)
            })?;
        Ok(Self { client, base_url: with_trailing_slash(base_url) })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: &Value) -> Result<Value, ProbeError> {
        let url = self.base_url.join(path)?;
        debug!(url = %url, "Sending probe request.");

        let response = self.client.post(url.clone()).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(url = %url, status = %status, bytes = bytes.len(), "Received probe response.");

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) if status.is_success() || remote_error(&value).is_some() => Ok(value),
            Ok(_) => Err(ProbeError::HttpStatus(status.as_u16())),
            Err(_) if !status.is_success() => Err(ProbeError::HttpStatus(status.as_u16())),
            Err(e) => Err(ProbeError::Malformed(e)),
        }
    }
}

/// Makes `url` usable as a join base: without a trailing slash `Url::join` drops the
/// last path segment, so `http://host/api` would lose its `api` prefix.
pub fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Returns the remote message when `value` is an application-level error reply.
fn remote_error(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    if object.get("status").and_then(Value::as_str) != Some("error") {
        return None;
    }
    let message = object
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error");
    Some(message.to_string())
}

fn is_remote_warning(value: &Value) -> bool {
    value.get("status").and_then(Value::as_str) == Some("warning")
}

// --- Client ---

/// Invokes catalog entries of one category against the remote service and turns
/// every outcome into a [`ScanResult`].
#[derive(Clone)]
pub struct ProbeClient {
    category: Category,
    transport: Arc<dyn Transport>,
    google_dorks: Arc<Vec<String>>,
}

impl std::fmt::Debug for ProbeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeClient")
            .field("category", &self.category)
            .field("google_dorks", &self.google_dorks)
            .finish_non_exhaustive()
    }
}

impl ProbeClient {
    pub fn new(category: Category, transport: Arc<dyn Transport>) -> Self {
        Self { category, transport, google_dorks: Arc::new(Vec::new()) }
    }

    pub fn with_google_dorks(mut self, dorks: Vec<String>) -> Self {
        self.google_dorks = Arc::new(dorks);
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Runs one probe against the remote service.
    ///
    /// The request goes to `<category>/<id>` under the transport's base URL and is
    /// bounded by `ctx`. This never fails: transport errors, timeouts, cancellation and
    /// remote error replies all become an error `ScanResult`.
    ///
    /// # Arguments
    ///
    /// * `spec` - The catalog entry to run, which fixes the path and payload shape.
    /// * `target` - The host, domain or URL placed in the payload.
    /// * `ctx` - The batch's cancellation token and per-probe deadline.
    ///
    /// # Returns
    ///
    /// A `ScanResult` whose message reads "<Name> for <target> completed" with the remote
    /// body as details, or "<Name> for <target> failed: <cause>" on any failure.
    pub async fn invoke(&self, spec: &ProbeSpec, target: &str, ctx: &ScanContext) -> ScanResult {
        info!(category = %self.category, scan = spec.id, target, "Starting probe.");
        let path = format!("{}/{}", self.category, spec.id);
        let body = spec.payload.body(target, &self.google_dorks);

        let outcome = ctx
            .guard(self.transport.post(&path, &body))
            .await
            .and_then(|data| match remote_error(&data) {
                Some(message) => Err(ProbeError::Remote(message)),
                None => Ok(data),
            });

        match outcome {
            Ok(data) => {
                let message = format!("{} for {} completed", spec.name, target);
                if is_remote_warning(&data) {
                    warn!(scan = spec.id, target, "Probe completed with a warning.");
                    ScanResult::warning(message, data)
                } else {
                    info!(scan = spec.id, target, "Probe completed.");
                    ScanResult::success(message, data)
                }
            }
            Err(e) => failure(spec.name, target, &e),
        }
    }
}

/// The error result for the probe called `name` whose call on `target` failed with `cause`.
pub fn failure(name: &str, target: &str, cause: &ProbeError) -> ScanResult {
    warn!(probe = name, target, error = %cause, "Probe failed.");
    ScanResult::error(format!("{name} for {target} failed: {cause}"))
}
