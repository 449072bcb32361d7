//! Error types for the annotation client

use chrono::{DateTime, Utc};

/// Errors produced while talking to the Grafana HTTP API
#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    /// Request could not be sent or its body could not be read
    #[error("{method} {path} failed: {source}")]
    Http {
        method: &'static str,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{method} {path} returned status {status}: {body}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    /// No dashboard carries the requested title
    #[error("dashboard '{name}' not found")]
    DashboardNotFound { name: String },

    /// Dashboard has no panel with the requested title
    #[error("panel '{panel}' not found on dashboard '{dashboard_uid}'")]
    PanelNotFound { dashboard_uid: String, panel: String },

    /// Response body did not have the expected shape
    #[error("malformed response from {path}: {source}")]
    MalformedResponse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Annotation range ends before it starts
    #[error("invalid time range: end {end} is before start {start}")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Required connection setting is absent
    #[error("missing Grafana setting: {0}")]
    MissingSetting(&'static str),

    /// Base URL or credentials cannot be used to build requests
    #[error("invalid Grafana setting {setting}: {reason}")]
    InvalidSetting {
        setting: &'static str,
        reason: String,
    },
}

impl AnnotationError {
    /// Create transport error
    pub fn http(method: &'static str, path: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            method,
            path: path.into(),
            source,
        }
    }

    /// Create decoding error
    pub fn malformed(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedResponse {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for annotation operations
pub type AnnotationResult<T> = Result<T, AnnotationError>;
