//! Annotation client
//!
//! Wraps the Grafana annotation, search and dashboard endpoints. Every
//! operation validates its input before the first request is sent.

use crate::config::GrafanaConfig;
use crate::error::{AnnotationError, AnnotationResult};
use crate::model::{
    check_range, Annotation, AnnotationQuery, AnnotationTarget, DashboardRef, NewAnnotation,
    PanelRef, ResolvedTarget,
};
use crate::transport::{AnnotationTransport, ReqwestTransport};
use serde::Deserialize;
use serde_json::{json, Value};

const ANNOTATIONS_PATH: &str = "/api/annotations";
const SEARCH_PATH: &str = "/api/search";

#[derive(Debug, Deserialize)]
struct SearchHit {
    uid: String,
    title: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DashboardEnvelope {
    dashboard: DashboardModel,
}

#[derive(Debug, Deserialize)]
struct DashboardModel {
    #[serde(default)]
    panels: Vec<Panel>,
}

#[derive(Debug, Deserialize)]
struct Panel {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    title: Option<String>,
    // collapsed rows carry their children here
    #[serde(default)]
    panels: Vec<Panel>,
}

impl Panel {
    fn find(panels: &[Panel], title: &str) -> Option<i64> {
        panels.iter().find_map(|panel| {
            if panel.title.as_deref() == Some(title) {
                if let Some(id) = panel.id {
                    return Some(id);
                }
            }
            Self::find(&panel.panels, title)
        })
    }
}

#[derive(Debug, Deserialize)]
struct Created {
    id: i64,
}

/// Grafana annotation client over a transport
#[derive(Debug, Clone)]
pub struct AnnotationClient<T> {
    transport: T,
}

impl AnnotationClient<ReqwestTransport> {
    /// Client for a configured Grafana instance
    ///
    /// # Errors
    /// See [`ReqwestTransport::new`].
    pub fn connect(config: &GrafanaConfig) -> AnnotationResult<Self> {
        Ok(Self::new(ReqwestTransport::new(config)?))
    }

    /// Client configured from the environment
    ///
    /// # Errors
    /// See [`GrafanaConfig::from_env`] and [`ReqwestTransport::new`].
    pub fn from_env() -> AnnotationResult<Self> {
        Self::connect(&GrafanaConfig::from_env()?)
    }
}

impl<T: AnnotationTransport> AnnotationClient<T> {
    /// Create client over a transport
    #[inline]
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Underlying transport
    #[inline]
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// UID of the dashboard whose title is exactly `title`
    ///
    /// # Errors
    /// [`AnnotationError::DashboardNotFound`] if no dashboard matches.
    pub async fn dashboard_uid(&self, title: &str) -> AnnotationResult<String> {
        let query = [("query".to_string(), title.to_string())];
        let hits: Vec<SearchHit> = self
            .transport
            .get(SEARCH_PATH, &query)
            .await?
            .ensure_success("GET", SEARCH_PATH)?
            .decode(SEARCH_PATH)?;

        hits.into_iter()
            .filter(|hit| hit.kind.as_deref().map_or(true, |k| k == "dash-db"))
            .find(|hit| hit.title == title)
            .map(|hit| hit.uid)
            .ok_or_else(|| AnnotationError::DashboardNotFound {
                name: title.to_string(),
            })
    }

    /// Id of the panel titled `title` on a dashboard, searching inside rows
    ///
    /// # Errors
    /// [`AnnotationError::PanelNotFound`] if no panel matches.
    pub async fn panel_id(&self, dashboard_uid: &str, title: &str) -> AnnotationResult<i64> {
        let path = format!("/api/dashboards/uid/{dashboard_uid}");
        let envelope: DashboardEnvelope = self
            .transport
            .get(&path, &[])
            .await?
            .ensure_success("GET", &path)?
            .decode(&path)?;

        Panel::find(&envelope.dashboard.panels, title).ok_or_else(|| {
            AnnotationError::PanelNotFound {
                dashboard_uid: dashboard_uid.to_string(),
                panel: title.to_string(),
            }
        })
    }

    /// Resolve titles in a target to API identifiers
    ///
    /// # Errors
    /// Lookup errors from [`Self::dashboard_uid`] and [`Self::panel_id`].
    pub async fn resolve(&self, target: &AnnotationTarget) -> AnnotationResult<ResolvedTarget> {
        let dashboard_uid = match &target.dashboard {
            DashboardRef::Uid(uid) => uid.clone(),
            DashboardRef::Title(title) => self.dashboard_uid(title).await?,
        };
        let panel_id = match &target.panel {
            None => None,
            Some(PanelRef::Id(id)) => Some(*id),
            Some(PanelRef::Title(title)) => Some(self.panel_id(&dashboard_uid, title).await?),
        };
        Ok(ResolvedTarget {
            dashboard_uid,
            panel_id,
        })
    }

    async fn resolve_optional(
        &self,
        target: Option<&AnnotationTarget>,
    ) -> AnnotationResult<Option<ResolvedTarget>> {
        match target {
            Some(target) => Ok(Some(self.resolve(target).await?)),
            None => Ok(None),
        }
    }

    /// Annotations in a time range, optionally narrowed by target and tags
    ///
    /// # Errors
    /// - [`AnnotationError::InvalidTimeRange`] if `end < start`
    /// - lookup, transport, status and decoding errors
    pub async fn query_annotations(
        &self,
        query: &AnnotationQuery,
    ) -> AnnotationResult<Vec<Annotation>> {
        check_range(query.start, query.end)?;
        let target = self.resolve_optional(query.target.as_ref()).await?;

        let mut params = vec![
            ("from".to_string(), query.start.timestamp_millis().to_string()),
            ("to".to_string(), query.end.timestamp_millis().to_string()),
            ("type".to_string(), "annotation".to_string()),
        ];
        if let Some(target) = &target {
            params.push(("dashboardUID".to_string(), target.dashboard_uid.clone()));
            if let Some(panel_id) = target.panel_id {
                params.push(("panelId".to_string(), panel_id.to_string()));
            }
        }
        params.extend(query.tags.iter().map(|tag| ("tags".to_string(), tag.clone())));
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        let annotations: Vec<Annotation> = self
            .transport
            .get(ANNOTATIONS_PATH, &params)
            .await?
            .ensure_success("GET", ANNOTATIONS_PATH)?
            .decode(ANNOTATIONS_PATH)?;

        tracing::debug!(count = annotations.len(), "queried annotations");
        Ok(annotations)
    }

    /// Create an annotation and return its id
    ///
    /// With `overwrite`, annotations with exactly the same range, owner
    /// and tags are removed first; others in the range are kept.
    ///
    /// # Errors
    /// - [`AnnotationError::InvalidTimeRange`] if `end < start`
    /// - lookup, transport, status and decoding errors
    pub async fn create_annotation(
        &self,
        annotation: &NewAnnotation,
        overwrite: bool,
    ) -> AnnotationResult<i64> {
        check_range(annotation.start, annotation.end)?;
        let target = self.resolve_optional(annotation.target.as_ref()).await?;

        if overwrite {
            let mut existing = annotation.overlapping_query();
            // already resolved; avoids a second round of lookups
            existing.target = target.as_ref().map(|t| AnnotationTarget {
                dashboard: DashboardRef::Uid(t.dashboard_uid.clone()),
                panel: t.panel_id.map(PanelRef::Id),
            });
            let candidates = self.query_annotations(&existing).await?;
            let found = candidates.len();
            let replaced: Vec<Annotation> = candidates
                .into_iter()
                .filter(|old| annotation.replaces(old, target.as_ref()))
                .collect();
            tracing::debug!(
                replaced = replaced.len(),
                kept = found - replaced.len(),
                "overwriting annotations"
            );
            for old in replaced {
                if !self.remove_annotation(old.id).await? {
                    tracing::warn!(id = old.id, "could not remove annotation being overwritten");
                }
            }
        }

        let mut body = json!({
            "time": annotation.start.timestamp_millis(),
            "timeEnd": annotation.end.timestamp_millis(),
            "text": annotation.text,
            "tags": annotation.tags,
        });
        if let (Some(target), Value::Object(fields)) = (&target, &mut body) {
            fields.insert("dashboardUID".to_string(), json!(target.dashboard_uid));
            if let Some(panel_id) = target.panel_id {
                fields.insert("panelId".to_string(), json!(panel_id));
            }
        }

        let created: Created = self
            .transport
            .post(ANNOTATIONS_PATH, &body)
            .await?
            .ensure_success("POST", ANNOTATIONS_PATH)?
            .decode(ANNOTATIONS_PATH)?;

        tracing::info!(id = created.id, text = %annotation.text, "created annotation");
        Ok(created.id)
    }

    /// Delete an annotation by id
    ///
    /// Returns `true` when Grafana answers 200, `false` for any other status.
    ///
    /// # Errors
    /// Transport failures only.
    pub async fn remove_annotation(&self, id: i64) -> AnnotationResult<bool> {
        let path = format!("{ANNOTATIONS_PATH}/{id}");
        let reply = self.transport.delete(&path).await?;
        if reply.status == 200 {
            tracing::info!(id, "removed annotation");
            Ok(true)
        } else {
            tracing::warn!(id, status = reply.status, body = %reply.body, "annotation not removed");
            Ok(false)
        }
    }
}
