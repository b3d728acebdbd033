//! Result cache behavior through `SumoClient::query`.
//!
//! # Invariants
//! - A live entry is served without any network call
//! - An expired entry causes a fresh job submission
//! - Concurrent identical queries share one backend job
//! - Failures are never cached

mod common;

use std::time::Duration;

use common::*;
use wiremock::matchers::{body_partial_json, method, path};

async fn mount_job(server: &MockServer, job_id: &str, submissions: u64) {
    Mock::given(method("POST"))
        .and(path("/search/jobs"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "id": job_id })))
        .expect(submissions)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/search/jobs/{job_id}")))
        .respond_with(Sequence::states(&["DONE GATHERING RESULTS"]))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/search/jobs/{job_id}/records")))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_page(0..2)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cache_hit_makes_no_network_call() {
    let server = MockServer::start().await;
    mount_job(&server, "J1", 1).await;

    let client = test_client(&server).build().unwrap();
    let first = client.query("foo", fixed_window()).await.unwrap();
    let before = server.received_requests().await.unwrap().len();
    let second = client.query("foo", fixed_window()).await.unwrap();
    let after = server.received_requests().await.unwrap().len();

    assert_eq!(first, second);
    assert_eq!(before, after, "cached query must not touch the network");
}

#[tokio::test]
async fn test_expired_entry_resubmits() {
    let server = MockServer::start().await;
    mount_job(&server, "J1", 2).await;

    let client = test_client(&server)
        .search_ttl(Duration::from_millis(50))
        .build()
        .unwrap();
    client.query("foo", fixed_window()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    client.query("foo", fixed_window()).await.unwrap();
}

#[tokio::test]
async fn test_different_requests_do_not_share_entries() {
    let server = MockServer::start().await;
    mount_job(&server, "J1", 2).await;

    let client = test_client(&server).build().unwrap();
    client.query("foo", fixed_window()).await.unwrap();
    client
        .query("foo", fixed_window().with_time_zone("Asia/Tokyo"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_identical_queries_share_one_job() {
    let server = MockServer::start().await;
    mount_job(&server, "J1", 1).await;

    let client = test_client(&server)
        .backoff(BackoffPolicy::fixed(Duration::from_millis(30)))
        .build()
        .unwrap();

    let (a, b) = tokio::join!(
        client.query("foo", fixed_window()),
        client.query("foo", fixed_window())
    );

    assert_eq!(a.unwrap().len(), 2);
    assert_eq!(b.unwrap().len(), 2);
}

#[tokio::test]
async fn test_disabled_cache_always_submits() {
    let server = MockServer::start().await;
    mount_job(&server, "J1", 2).await;

    let client = test_client(&server).cache_enabled(false).build().unwrap();
    client.query("foo", fixed_window()).await.unwrap();
    client.query("foo", fixed_window()).await.unwrap();
}

#[tokio::test]
async fn test_clear_cache_forces_resubmission() {
    let server = MockServer::start().await;
    mount_job(&server, "J1", 2).await;

    let client = test_client(&server).build().unwrap();
    client.query("foo", fixed_window()).await.unwrap();
    client.clear_cache();
    client.query("foo", fixed_window()).await.unwrap();
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/jobs"))
        .and(body_partial_json(json!({ "query": "foo" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_job(&server, "J1", 1).await;

    let client = test_client(&server).build().unwrap();
    let err = client.query("foo", fixed_window()).await.unwrap_err();
    assert!(matches!(err.root(), ClientError::ApiError { status: 500, .. }), "{err:?}");

    let rows = client.query("foo", fixed_window()).await.unwrap();
    assert_eq!(rows.len(), 2);
}
