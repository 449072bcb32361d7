//! SWxSOC Dashboard Annotations
//!
//! Async client for creating, querying and removing Grafana annotations
//! that mark events (flares, anomalies, pipeline runs) on mission
//! dashboards.
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::{TimeZone, Utc};
//! use swxsoc_annotations::{AnnotationClient, AnnotationTarget, NewAnnotation};
//!
//! # async fn run() -> Result<(), swxsoc_annotations::AnnotationError> {
//! let client = AnnotationClient::from_env()?;
//! let start = Utc.with_ymd_and_hms(2024, 9, 16, 13, 30, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2024, 9, 16, 13, 35, 0).unwrap();
//!
//! let annotation = NewAnnotation::new(start, end, "Observed solar flare")
//!     .with_tags(["meddea", "flare"])
//!     .with_target(AnnotationTarget::dashboard_title("Quicklook").with_panel_title("Spectra"));
//! let id = client.create_annotation(&annotation, true).await?;
//! client.remove_annotation(id).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod transport;

// Re-exports
pub use client::AnnotationClient;
pub use config::{GrafanaConfig, GRAFANA_API_KEY_ENV, GRAFANA_URL_ENV};
pub use error::{AnnotationError, AnnotationResult};
pub use model::{
    Annotation, AnnotationQuery, AnnotationTarget, DashboardRef, NewAnnotation, PanelRef,
    ResolvedTarget,
};
pub use transport::{AnnotationTransport, HttpReply, ReqwestTransport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
