//! HTTP transport seam
//!
//! [`AnnotationTransport`] is the narrow GET/POST/DELETE surface the
//! client needs. [`ReqwestTransport`] talks to a real Grafana instance;
//! tests substitute their own implementation.

use crate::config::GrafanaConfig;
use crate::error::{AnnotationError, AnnotationResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;

/// Status and raw body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpReply {
    /// Reply with a JSON body
    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    /// Status is 2xx
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with [`AnnotationError::Status`] unless the status is 2xx
    ///
    /// # Errors
    /// [`AnnotationError::Status`] carrying the body text.
    pub fn ensure_success(self, method: &'static str, path: &str) -> AnnotationResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(AnnotationError::Status {
                method,
                path: path.to_string(),
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Decode the body
    ///
    /// # Errors
    /// [`AnnotationError::MalformedResponse`] if the body does not decode as `T`.
    pub fn decode<T: DeserializeOwned>(&self, path: &str) -> AnnotationResult<T> {
        serde_json::from_str(&self.body).map_err(|e| AnnotationError::malformed(path, e))
    }
}

/// Minimal HTTP surface used by the annotation client
///
/// Paths are relative to the Grafana base URL (e.g. `/api/annotations`).
/// Implementations report transport failures as errors and return every
/// received response, whatever its status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnnotationTransport: Send + Sync {
    /// GET with query parameters; keys may repeat
    async fn get(&self, path: &str, query: &[(String, String)]) -> AnnotationResult<HttpReply>;

    /// POST a JSON body
    async fn post(&self, path: &str, body: &serde_json::Value) -> AnnotationResult<HttpReply>;

    /// DELETE a resource
    async fn delete(&self, path: &str) -> AnnotationResult<HttpReply>;
}

/// Grafana transport over `reqwest` with bearer authentication
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a client for the configured instance
    ///
    /// # Errors
    /// [`AnnotationError::InvalidSetting`] if the URL does not parse, the
    /// key is not a valid header value, or the client cannot be built.
    pub fn new(config: &GrafanaConfig) -> AnnotationResult<Self> {
        reqwest::Url::parse(config.base_url()).map_err(|e| AnnotationError::InvalidSetting {
            setting: "base_url",
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key())).map_err(
            |e| AnnotationError::InvalidSetting {
                setting: "api_key",
                reason: e.to_string(),
            },
        )?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| AnnotationError::InvalidSetting {
                setting: "client",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        method: &'static str,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> AnnotationResult<HttpReply> {
        let response = request
            .send()
            .await
            .map_err(|e| AnnotationError::http(method, path, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AnnotationError::http(method, path, e))?;
        tracing::debug!(method, path, status, "grafana response");
        Ok(HttpReply { status, body })
    }
}

#[async_trait]
impl AnnotationTransport for ReqwestTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> AnnotationResult<HttpReply> {
        Self::send("GET", path, self.client.get(self.url(path)).query(query)).await
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> AnnotationResult<HttpReply> {
        Self::send("POST", path, self.client.post(self.url(path)).json(body)).await
    }

    async fn delete(&self, path: &str) -> AnnotationResult<HttpReply> {
        Self::send("DELETE", path, self.client.delete(self.url(path))).await
    }
}
