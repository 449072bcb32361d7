//! Request shapes observed through a recording transport

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Mutex;
use swxsoc_annotations::{
    AnnotationClient, AnnotationQuery, AnnotationResult, AnnotationTarget, AnnotationTransport,
    HttpReply, NewAnnotation,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Get(String, Vec<(String, String)>),
    Post(String, Value),
    Delete(String),
}

/// Answers every request from a fixed script and records what was sent
struct Recorder {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<Vec<HttpReply>>,
}

impl Recorder {
    fn new(replies: Vec<HttpReply>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into_iter().rev().collect()),
        }
    }

    fn answer(&self, call: Call) -> AnnotationResult<HttpReply> {
        self.calls.lock().unwrap().push(call);
        Ok(self.replies.lock().unwrap().pop().expect("scripted reply"))
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnnotationTransport for Recorder {
    async fn get(&self, path: &str, query: &[(String, String)]) -> AnnotationResult<HttpReply> {
        self.answer(Call::Get(path.to_string(), query.to_vec()))
    }

    async fn post(&self, path: &str, body: &Value) -> AnnotationResult<HttpReply> {
        self.answer(Call::Post(path.to_string(), body.clone()))
    }

    async fn delete(&self, path: &str) -> AnnotationResult<HttpReply> {
        self.answer(Call::Delete(path.to_string()))
    }
}

fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

#[tokio::test]
async fn query_sends_repeated_tags_in_order() {
    let start = Utc.with_ymd_and_hms(2024, 9, 16, 13, 30, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 9, 16, 13, 35, 0).unwrap();
    let client = AnnotationClient::new(Recorder::new(vec![HttpReply::json(200, &json!([]))]));

    let query = AnnotationQuery::new(start, end)
        .with_target(AnnotationTarget::dashboard_uid("abc").with_panel_id(3))
        .with_tags(["meddea", "test"])
        .with_limit(50);
    client.query_annotations(&query).await.unwrap();

    assert_eq!(
        client.transport().calls(),
        vec![Call::Get(
            "/api/annotations".to_string(),
            vec![
                pair("from", "1726493400000"),
                pair("to", "1726493700000"),
                pair("type", "annotation"),
                pair("dashboardUID", "abc"),
                pair("panelId", "3"),
                pair("tags", "meddea"),
                pair("tags", "test"),
                pair("limit", "50"),
            ],
        )]
    );
}

#[tokio::test]
async fn create_by_titles_resolves_then_posts() {
    let start = Utc.with_ymd_and_hms(2024, 9, 16, 13, 30, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 9, 16, 13, 35, 0).unwrap();
    let client = AnnotationClient::new(Recorder::new(vec![
        HttpReply::json(200, &json!([{"uid": "q1", "title": "Quicklook", "type": "dash-db"}])),
        HttpReply::json(200, &json!({"dashboard": {"panels": [{"id": 12, "title": "Spectra"}]}})),
        HttpReply::json(200, &json!({"id": 77})),
    ]));

    let annotation = NewAnnotation::new(start, end, "Observed solar flare")
        .with_tags(["flare"])
        .with_target(AnnotationTarget::dashboard_title("Quicklook").with_panel_title("Spectra"));
    assert_eq!(client.create_annotation(&annotation, false).await.unwrap(), 77);

    let calls = client.transport().calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[0],
        Call::Get("/api/search".to_string(), vec![pair("query", "Quicklook")])
    );
    assert_eq!(
        calls[1],
        Call::Get("/api/dashboards/uid/q1".to_string(), Vec::new())
    );
    assert_eq!(
        calls[2],
        Call::Post(
            "/api/annotations".to_string(),
            json!({
                "time": 1_726_493_400_000_i64,
                "timeEnd": 1_726_493_700_000_i64,
                "text": "Observed solar flare",
                "tags": ["flare"],
                "dashboardUID": "q1",
                "panelId": 12
            })
        )
    );
}

#[tokio::test]
async fn remove_uses_id_path() {
    let client = AnnotationClient::new(Recorder::new(vec![HttpReply::json(200, &json!({}))]));
    assert!(client.remove_annotation(123).await.unwrap());
    assert_eq!(
        client.transport().calls(),
        vec![Call::Delete("/api/annotations/123".to_string())]
    );
}
