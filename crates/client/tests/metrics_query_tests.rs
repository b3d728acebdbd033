//! Metrics Query API tests.
//!
//! # Invariants
//! - Blank queries are dropped and row ids start at `A`
//! - Structured backend errors are joined one per line
//! - Successful responses are cached for the metrics TTL

mod common;

use std::time::Duration;

use chrono::{TimeZone, Utc};
use common::*;
use wiremock::matchers::{body_partial_json, header, method, path};

fn last_hour() -> TimeRange {
    TimeRange::between(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap(),
    )
}

#[tokio::test]
async fn test_metrics_query_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/metricsQueries"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_partial_json(json!({
            "queries": [
                { "query": "metric=CPU_Total", "rowId": "A" },
                { "query": "metric=Mem_Used", "rowId": "B" }
            ],
            "timeRange": { "type": "BeginBoundedTimeRange" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("metrics/query_result.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server).build().unwrap();
    let body = client
        .metrics_query(["metric=CPU_Total", " ", "metric=Mem_Used"], last_hour())
        .await
        .unwrap();

    assert_eq!(body["queryResult"][0]["rowId"], "A");
}

#[tokio::test]
async fn test_metrics_results_are_cached() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/metricsQueries"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("metrics/query_result.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server).build().unwrap();
    let first = client
        .metrics_query(["metric=CPU_Total"], last_hour())
        .await
        .unwrap();
    let second = client
        .metrics_query(["metric=CPU_Total"], last_hour())
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_structured_error_is_joined() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/metricsQueries"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(load_fixture("metrics/query_error.json")),
        )
        .mount(&server)
        .await;

    let client = test_client(&server).build().unwrap();
    let err = client
        .metrics_query(["metric=CPU_Total |"], last_hour())
        .await
        .unwrap_err();

    match err.root() {
        ClientError::ApiError {
            status,
            message,
            request_id,
            ..
        } => {
            assert_eq!(*status, 400);
            assert_eq!(
                message,
                "metrics:query_parse_error: Unable to parse query at position 7.\nmetrics:query_failed: Row A failed."
            );
            assert_eq!(request_id.as_deref(), Some("5J8KD-KTLYN-0QKPA"));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_payload_on_success_status_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/metricsQueries"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("metrics/query_error.json")),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server).build().unwrap();
    for _ in 0..2 {
        let err = client
            .metrics_query(["metric=CPU_Total"], last_hour())
            .await
            .unwrap_err();
        match err.root() {
            ClientError::MetricsQueryFailed { id, message } => {
                assert_eq!(id, "5J8KD-KTLYN-0QKPA");
                assert_eq!(message.lines().count(), 2);
            }
            other => panic!("expected MetricsQueryFailed, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_undecodable_body_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/metricsQueries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = test_client(&server).build().unwrap();
    let err = client
        .metrics_query(["metric=CPU_Total"], last_hour())
        .await
        .unwrap_err();

    assert!(matches!(err.root(), ClientError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn test_metrics_timeout_is_enforced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/metricsQueries"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(load_fixture("metrics/query_result.json"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server)
        .metrics_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let err = client
        .metrics_query(["metric=CPU_Total"], last_hour())
        .await
        .unwrap_err();

    match err.root() {
        ClientError::HttpError(e) => assert!(e.is_timeout(), "{e:?}"),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_metrics_connect_timeout_independent_of_job_client() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/metricsQueries"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("metrics/query_result.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server)
        .connect_timeout(Duration::from_nanos(1))
        .metrics_timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    let body = client
        .metrics_query(["metric=CPU_Total"], last_hour())
        .await
        .unwrap();
    assert!(body.get("queryResult").is_some());
}
