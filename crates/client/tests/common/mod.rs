//! Common test utilities for integration tests.
//!
//! Shared client setup, fixtures and `wiremock` responders for the Sumo Logic
//! client. All integration tests should use these utilities to ensure consistency.
//!
//! # Invariants
//! - Clients built here never sleep for real backoff: polls are 1ms apart and
//!   page throttling is off
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{TimeZone, Utc};

#[allow(unused_imports)]
pub use serde_json::{Value, json};
#[allow(unused_imports)]
pub use sumo_client::testing::{job_status, load_fixture, records_page};
#[allow(unused_imports)]
pub use sumo_client::{
    BackoffPolicy, ClientError, JobState, PollProgress, SearchOptions, SumoClient,
    SumoClientBuilder, TimeRange,
};
#[allow(unused_imports)]
pub use sumo_config::Credentials;
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// `Authorization` header value for [`credentials`].
#[allow(dead_code)]
pub const BASIC_AUTH: &str = "Basic aWQ6a2V5";

pub fn credentials() -> Credentials {
    Credentials::new("id", "key")
}

/// Builder pointed at the mock server with test-speed timings.
pub fn test_client(server: &MockServer) -> SumoClientBuilder {
    SumoClient::builder()
        .endpoint(server.uri())
        .credentials(credentials())
        .backoff(BackoffPolicy::fixed(Duration::from_millis(1)))
        .page_throttle(Duration::ZERO)
        .max_retries(0)
}

/// A fixed one-hour search window so repeated calls share a fingerprint.
#[allow(dead_code)]
pub fn fixed_window() -> SearchOptions {
    SearchOptions::new()
        .with_from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .with_to(Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap())
        .with_time_zone("UTC")
}

/// Replays responses in order, repeating the last one once exhausted.
#[allow(dead_code)]
pub struct Sequence {
    responses: Vec<ResponseTemplate>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl Sequence {
    pub fn new(responses: Vec<ResponseTemplate>) -> Self {
        assert!(!responses.is_empty(), "Sequence needs at least one response");
        Self {
            responses,
            calls: AtomicUsize::new(0),
        }
    }

    /// A 200 status response per backend state string.
    pub fn states(states: &[&str]) -> Self {
        Self::new(
            states
                .iter()
                .map(|s| ResponseTemplate::new(200).set_body_json(job_status(s)))
                .collect(),
        )
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses[call.min(self.responses.len() - 1)].clone()
    }
}

/// Serves `total` rows, slicing by the `offset` and `limit` query parameters.
#[allow(dead_code)]
pub struct PagedRecords {
    pub total: usize,
}

impl Respond for PagedRecords {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let param = |name: &str| {
            request
                .url
                .query_pairs()
                .find(|(k, _)| k == name)
                .and_then(|(_, v)| v.parse::<usize>().ok())
        };
        let offset = param("offset").unwrap_or(0).min(self.total);
        let limit = param("limit").unwrap_or(10_000);
        let end = (offset + limit).min(self.total);

        ResponseTemplate::new(200).set_body_json(records_page(offset..end))
    }
}

/// Counts progress calls.
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingProgress {
    pub added: AtomicU64,
    pub advanced: AtomicU64,
}

impl PollProgress for CountingProgress {
    fn add_steps(&self, n: u64) {
        self.added.fetch_add(n, Ordering::SeqCst);
    }

    fn advance(&self, n: u64) {
        self.advanced.fetch_add(n, Ordering::SeqCst);
    }
}

/// Requests the server received for a method and exact path.
#[allow(dead_code)]
pub async fn requests_to(server: &MockServer, http_method: &str, path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == http_method && r.url.path() == path)
        .collect()
}
