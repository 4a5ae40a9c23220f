//! Tests for the HTTP job store client against a mock REST endpoint.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clipforge_models::{JobId, JobKind, JobStatus};

use crate::client::{HttpJobStore, JobStore, StoreConfig};
use crate::error::StoreError;

fn test_config(base_url: &str) -> StoreConfig {
    StoreConfig {
        base_url: base_url.to_string(),
        table: "job_statuses".to_string(),
        api_key: Some("test-key".to_string()),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    }
}

fn row(job_id: &str, status: &str) -> serde_json::Value {
    json!({
        "job_id": job_id,
        "job_type": "EXTRACT_CLIP",
        "status": status,
        "input_payload": {},
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn create_posts_pending_record_and_returns_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job_statuses"))
        .and(header("Prefer", "return=representation"))
        .and(header("apikey", "test-key"))
        .and(body_partial_json(json!({
            "job_type": "EXTRACT_CLIP",
            "status": "PENDING"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([row("job-1", "PENDING")])))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpJobStore::new(test_config(&server.uri())).unwrap();
    let id = store
        .create(JobKind::ExtractClip, json!({"input_path": "in.mp4"}))
        .await
        .unwrap();

    assert_eq!(id.as_str(), "job-1");
}

#[tokio::test]
async fn create_with_zero_rows_back_is_persistence_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job_statuses"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = HttpJobStore::new(test_config(&server.uri())).unwrap();
    let err = store
        .create(JobKind::GetMetadata, json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::PersistenceFailed(_)));
}

#[tokio::test]
async fn create_surfaces_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job_statuses"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let store = HttpJobStore::new(test_config(&server.uri())).unwrap();
    let err = store
        .create(JobKind::OverlayCaptions, json!({}))
        .await
        .unwrap_err();

    match err {
        StoreError::RequestFailed(msg) => assert!(msg.contains("500")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn create_rejects_unparseable_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job_statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let store = HttpJobStore::new(test_config(&server.uri())).unwrap();
    let err = store.create(JobKind::ExtractClip, json!({})).await.unwrap_err();

    assert!(matches!(err, StoreError::InvalidResponse(_)));
}

#[tokio::test]
async fn update_patches_row_by_id_filter() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/job_statuses"))
        .and(query_param("job_id", "eq.job-7"))
        .and(body_partial_json(json!({
            "status": "COMPLETED",
            "output_details": {"output_file": "clip.mp4"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row("job-7", "COMPLETED")])))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpJobStore::new(test_config(&server.uri())).unwrap();
    store
        .update(
            &JobId::from_string("job-7"),
            JobStatus::Completed,
            Some(json!({"output_file": "clip.mp4"})),
            None,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn update_attaches_error_message_on_failure_status() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/job_statuses"))
        .and(query_param("job_id", "eq.job-8"))
        .and(body_partial_json(json!({
            "status": "QUEUE_FAILED",
            "error_message": "queue full"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row("job-8", "QUEUE_FAILED")])))
        .mount(&server)
        .await;

    let store = HttpJobStore::new(test_config(&server.uri())).unwrap();
    store
        .update(
            &JobId::from_string("job-8"),
            JobStatus::QueueFailed,
            None,
            Some("queue full".to_string()),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn update_matching_no_rows_is_persistence_failure() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/job_statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = HttpJobStore::new(test_config(&server.uri())).unwrap();
    let err = store
        .update(
            &JobId::from_string("missing"),
            JobStatus::Processing,
            None,
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::PersistenceFailed(_)));
}
