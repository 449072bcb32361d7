//! Annotation data types

use crate::error::{AnnotationError, AnnotationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dashboard selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardRef {
    /// Dashboard UID as used by the API
    Uid(String),
    /// Dashboard title, resolved through search
    Title(String),
}

/// Panel selector within a dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelRef {
    /// Numeric panel id
    Id(i64),
    /// Panel title, resolved from the dashboard model
    Title(String),
}

/// Dashboard and optional panel an annotation belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationTarget {
    /// Owning dashboard
    pub dashboard: DashboardRef,
    /// Panel; `None` annotates the whole dashboard
    pub panel: Option<PanelRef>,
}

impl AnnotationTarget {
    /// Target a dashboard by title
    #[must_use]
    pub fn dashboard_title(title: impl Into<String>) -> Self {
        Self {
            dashboard: DashboardRef::Title(title.into()),
            panel: None,
        }
    }

    /// Target a dashboard by UID
    #[must_use]
    pub fn dashboard_uid(uid: impl Into<String>) -> Self {
        Self {
            dashboard: DashboardRef::Uid(uid.into()),
            panel: None,
        }
    }

    /// Narrow to a panel given by title
    #[inline]
    #[must_use]
    pub fn with_panel_title(mut self, title: impl Into<String>) -> Self {
        self.panel = Some(PanelRef::Title(title.into()));
        self
    }

    /// Narrow to a panel given by id
    #[inline]
    #[must_use]
    pub fn with_panel_id(mut self, id: i64) -> Self {
        self.panel = Some(PanelRef::Id(id));
        self
    }
}

/// Target with every name resolved to API identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Dashboard UID
    pub dashboard_uid: String,
    /// Panel id; `None` for a dashboard-wide target
    pub panel_id: Option<i64>,
}

/// Stored annotation as returned by `GET /api/annotations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Annotation id, used for removal
    pub id: i64,
    /// Start, epoch milliseconds
    pub time: i64,
    /// End, epoch milliseconds; equal to `time` for point annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_end: Option<i64>,
    /// Annotation text
    #[serde(default)]
    pub text: String,
    /// Tags, in the order stored
    #[serde(default)]
    pub tags: Vec<String>,
    /// Owning dashboard; absent or empty for organization annotations
    #[serde(default, rename = "dashboardUID", skip_serializing_if = "Option::is_none")]
    pub dashboard_uid: Option<String>,
    /// Owning panel; absent or 0 for dashboard-wide annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_id: Option<i64>,
}

impl Annotation {
    /// Start as a UTC timestamp
    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }

    /// End as a UTC timestamp, falling back to the start
    #[must_use]
    pub fn end(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time_end.unwrap_or(self.time))
    }
}

/// Filter for [`crate::AnnotationClient::query_annotations`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationQuery {
    /// Range start
    pub start: DateTime<Utc>,
    /// Range end
    pub end: DateTime<Utc>,
    /// Restrict to a dashboard or panel
    pub target: Option<AnnotationTarget>,
    /// Annotations must carry all of these tags
    pub tags: Vec<String>,
    /// Maximum number of annotations returned
    pub limit: Option<u32>,
}

impl AnnotationQuery {
    /// Query a time range with no other filter
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            target: None,
            tags: Vec::new(),
            limit: None,
        }
    }

    /// Restrict to a dashboard or panel
    #[inline]
    #[must_use]
    pub fn with_target(mut self, target: AnnotationTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Require all of these tags
    #[inline]
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Cap the number of results
    #[inline]
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Annotation to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnnotation {
    /// Range start
    pub start: DateTime<Utc>,
    /// Range end; equal to `start` for a point annotation
    pub end: DateTime<Utc>,
    /// Annotation text
    pub text: String,
    /// Tags to attach
    pub tags: Vec<String>,
    /// Dashboard or panel; `None` creates an organization annotation
    pub target: Option<AnnotationTarget>,
}

impl NewAnnotation {
    /// Untagged, organization-wide annotation over a range
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            tags: Vec::new(),
            target: None,
        }
    }

    /// Attach tags
    #[inline]
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Attach to a dashboard or panel
    #[inline]
    #[must_use]
    pub fn with_target(mut self, target: AnnotationTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Query for candidates this one would replace
    ///
    /// Results may include annotations that only overlap or carry extra
    /// tags; filter them with [`NewAnnotation::replaces`].
    #[must_use]
    pub fn overlapping_query(&self) -> AnnotationQuery {
        AnnotationQuery {
            start: self.start,
            end: self.end,
            target: self.target.clone(),
            tags: self.tags.clone(),
            limit: None,
        }
    }

    /// Whether creating this annotation with overwrite removes `existing`
    ///
    /// Requires the exact same range in milliseconds, the same tag set, and
    /// the same owner: `target` when given, otherwise no dashboard.
    #[must_use]
    pub fn replaces(&self, existing: &Annotation, target: Option<&ResolvedTarget>) -> bool {
        let start = self.start.timestamp_millis();
        let end = self.end.timestamp_millis();
        if existing.time != start || existing.time_end.unwrap_or(existing.time) != end {
            return false;
        }

        let mut wanted: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        let mut found: Vec<&str> = existing.tags.iter().map(String::as_str).collect();
        wanted.sort_unstable();
        wanted.dedup();
        found.sort_unstable();
        found.dedup();
        if wanted != found {
            return false;
        }

        let dashboard = existing.dashboard_uid.as_deref().filter(|uid| !uid.is_empty());
        let panel = existing.panel_id.filter(|id| *id != 0);
        match target {
            Some(target) => {
                dashboard == Some(target.dashboard_uid.as_str()) && panel == target.panel_id
            }
            None => dashboard.is_none() && panel.is_none(),
        }
    }
}

/// Reject ranges that end before they start
pub(crate) fn check_range(start: DateTime<Utc>, end: DateTime<Utc>) -> AnnotationResult<()> {
    if end < start {
        return Err(AnnotationError::InvalidTimeRange { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_grafana_payload() {
        let body = r#"[{
            "id": 1,
            "time": 1663351800000,
            "timeEnd": 1663352100000,
            "text": "Solar flare",
            "tags": ["meddea", "test"],
            "dashboardUID": "abc",
            "panelId": 4,
            "alertId": 0
        }]"#;
        let annotations: Vec<Annotation> = serde_json::from_str(body).unwrap();
        assert_eq!(annotations.len(), 1);
        let a = &annotations[0];
        assert_eq!(a.text, "Solar flare");
        assert_eq!(a.dashboard_uid.as_deref(), Some("abc"));
        assert_eq!(a.panel_id, Some(4));
        assert_eq!(
            a.start().unwrap(),
            Utc.with_ymd_and_hms(2022, 9, 16, 18, 10, 0).unwrap()
        );
        assert_eq!(
            a.end().unwrap(),
            Utc.with_ymd_and_hms(2022, 9, 16, 18, 15, 0).unwrap()
        );
    }

    #[test]
    fn point_annotation_ends_at_start() {
        let a: Annotation = serde_json::from_str(r#"{"id": 2, "time": 0}"#).unwrap();
        assert_eq!(a.end(), a.start());
        assert!(a.tags.is_empty());
    }

    #[test]
    fn replaces_only_same_range_tags_and_owner() {
        let start = Utc.with_ymd_and_hms(2024, 9, 16, 13, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 9, 16, 13, 35, 0).unwrap();
        let new = NewAnnotation::new(start, end, "flare").with_tags(["meddea", "test"]);
        let same = Annotation {
            id: 1,
            time: start.timestamp_millis(),
            time_end: Some(end.timestamp_millis()),
            text: "old flare".to_string(),
            tags: vec!["test".to_string(), "meddea".to_string()],
            dashboard_uid: None,
            panel_id: Some(0),
        };
        assert!(new.replaces(&same, None));

        let inner = Annotation {
            time_end: Some(end.timestamp_millis() - 1),
            ..same.clone()
        };
        assert!(!new.replaces(&inner, None));

        let extra_tag = Annotation {
            tags: vec!["meddea".to_string(), "test".to_string(), "ops".to_string()],
            ..same.clone()
        };
        assert!(!new.replaces(&extra_tag, None));

        let on_dashboard = Annotation {
            dashboard_uid: Some("other-dash".to_string()),
            ..same.clone()
        };
        assert!(!new.replaces(&on_dashboard, None));

        let target = ResolvedTarget {
            dashboard_uid: "other-dash".to_string(),
            panel_id: None,
        };
        assert!(new.replaces(&on_dashboard, Some(&target)));
        assert!(!new.replaces(&same, Some(&target)));

        let on_panel = Annotation {
            panel_id: Some(4),
            ..on_dashboard
        };
        assert!(!new.replaces(&on_panel, Some(&target)));
        let panel_target = ResolvedTarget {
            panel_id: Some(4),
            ..target
        };
        assert!(new.replaces(&on_panel, Some(&panel_target)));
    }

    #[test]
    fn range_check() {
        let start = Utc.with_ymd_and_hms(2024, 9, 16, 13, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 9, 16, 13, 35, 0).unwrap();
        assert!(check_range(start, end).is_ok());
        assert!(check_range(start, start).is_ok());
        assert!(matches!(
            check_range(end, start),
            Err(AnnotationError::InvalidTimeRange { .. })
        ));
    }
}
