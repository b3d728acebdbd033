//! Shared test utilities for sumo-cli integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Mount a complete search job lifecycle on a `wiremock` server.
//!
//! Invariants / Assumptions:
//! - Commands never read a real credentials file or `.env`.
//! - Polling and page throttling run at test speed (1ms / 0ms).

use assert_cmd::Command;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Returns a hermetic `sumo-cli` command for integration testing.
///
/// - `DOTENV_DISABLED=1` prevents local `.env` contamination.
/// - Dummy credentials satisfy config validation.
/// - The credentials file path points at a location that never exists.
pub fn sumo_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("sumo-cli");

    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("SUMOLOGIC_ENDPOINT")
        .env_remove("SUMOLOGIC_TIMEZONE")
        .env_remove("SUMOLOGIC_QUERY_COMMENT")
        .env_remove("SUMOLOGIC_OTLP_ENDPOINT")
        .env_remove("SUMOLOGIC_RECORD_LIMIT")
        .env_remove("RUST_LOG");

    cmd.env("SUMOLOGIC_ACCESS_ID", "test-id")
        .env("SUMOLOGIC_ACCESS_KEY", "test-key")
        .env(
            "SUMOLOGIC_CONFIG_PATH",
            std::env::temp_dir().join("sumo-cli-tests-missing/credentials.json"),
        )
        .env("SUMOLOGIC_POLL_INITIAL_MS", "1")
        .env("SUMOLOGIC_POLL_MAX_MS", "1")
        .env("SUMOLOGIC_PAGE_THROTTLE_MS", "0")
        .env("SUMOLOGIC_MAX_RETRIES", "0");

    cmd
}

/// `sumo_cmd()` pointed at a mock server.
#[allow(dead_code)]
pub fn sumo_cmd_with_endpoint(endpoint: &str) -> Command {
    let mut cmd = sumo_cmd();
    cmd.env("SUMOLOGIC_ENDPOINT", endpoint);
    cmd
}

/// Mount submit, one DONE status and a single records page.
#[allow(dead_code)]
pub async fn mount_completed_job(server: &MockServer, records: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/search/jobs"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "id": "J1" })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/jobs/J1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "DONE GATHERING RESULTS",
            "messageCount": 10,
            "recordCount": 2,
            "pendingErrors": [],
            "pendingWarnings": []
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/jobs/J1/records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fields": [],
            "records": records
        })))
        .mount(server)
        .await;
}
