//! Exit code mapping for configuration, transport and API failures.

mod common;

use common::{mount_completed_job, sumo_cmd, sumo_cmd_with_endpoint};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_missing_credentials_exits_2() {
    sumo_cmd()
        .env_remove("SUMOLOGIC_ACCESS_ID")
        .env_remove("SUMOLOGIC_ACCESS_KEY")
        .args(["search", "count", "--no-progress"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("SUMOLOGIC_ACCESS_ID"));
}

#[test]
fn test_connection_refused_exits_3() {
    sumo_cmd_with_endpoint("http://127.0.0.1:1")
        .args(["search", "count", "--no-progress"])
        .assert()
        .code(3);
}

#[tokio::test]
async fn test_unauthorized_exits_2() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search/jobs"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    sumo_cmd_with_endpoint(&server.uri())
        .args(["search", "count", "--no-progress"])
        .assert()
        .code(2);
}

#[tokio::test]
async fn test_bad_query_exits_5() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search/jobs"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400,
            "id": "IUUQI-DGH5I-TJ045",
            "code": "searchjob.invalid.query",
            "message": "Unable to parse query."
        })))
        .mount(&server)
        .await;

    sumo_cmd_with_endpoint(&server.uri())
        .args(["search", "count by (", "--no-progress"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("searchjob.invalid.query"));
}

#[tokio::test]
async fn test_unknown_job_state_exits_9() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search/jobs"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "id": "J9" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/jobs/J9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "PAUSED",
            "messageCount": 0,
            "recordCount": 0,
            "pendingErrors": [],
            "pendingWarnings": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/search/jobs/J9"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    sumo_cmd_with_endpoint(&server.uri())
        .args(["search", "count", "--no-progress"])
        .assert()
        .code(9)
        .stderr(predicate::str::contains("PAUSED"));
}

#[tokio::test]
async fn test_cli_flags_override_environment() {
    let server = MockServer::start().await;
    mount_completed_job(&server, json!([])).await;

    sumo_cmd()
        .env("SUMOLOGIC_ENDPOINT", "http://127.0.0.1:1")
        .args(["search", "count", "--no-progress", "--endpoint"])
        .arg(server.uri())
        .assert()
        .success();
}
