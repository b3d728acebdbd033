//! Search Job API endpoints.
//!
//! # What this module handles:
//! - `POST /search/jobs` (submission, must answer 202)
//! - `GET /search/jobs/{id}` (one status poll, 429 mapped to a rate-limited status)
//! - `GET /search/jobs/{id}/records` (one page of aggregate records)
//! - `DELETE /search/jobs/{id}`
//!
//! # What this module does NOT handle:
//! - Poll scheduling, pagination loops or caching (see [`crate::client`])

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use sumo_config::Credentials;
use tracing::debug;

use crate::endpoints::request::{
    api_error_from_response, authorized, send_once, send_request_with_retry,
};
use crate::endpoints::url_encoding::encode_path_segment;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{
    CreateJobResponse, JobStatus, JobStatusResponse, RecordSet, RecordsResponse, SearchRequest,
};

/// Decode a response body, reporting malformed JSON as [`ClientError::InvalidResponse`].
pub(crate) async fn decode_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

/// Submit a search job and return its id.
///
/// Any status other than 202 Accepted is an error, even another 2xx.
pub async fn create_job(
    client: &Client,
    endpoint: &str,
    credentials: &Credentials,
    request: &SearchRequest,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<String> {
    debug!(from = %request.from, to = %request.to, time_zone = %request.time_zone, "Submitting search job");

    let url = format!("{}/search/jobs", endpoint);
    let builder = authorized(client.post(&url), credentials).json(request);
    let response =
        send_request_with_retry(builder, max_retries, "/search/jobs", "POST", metrics).await?;

    if response.status() != StatusCode::ACCEPTED {
        let err = api_error_from_response(response).await;
        return Err(match err {
            ClientError::ApiError {
                status,
                url,
                message,
                request_id,
            } => ClientError::ApiError {
                status,
                url,
                message: format!("expected 202 Accepted: {message}"),
                request_id,
            },
            other => other,
        });
    }

    let created: CreateJobResponse = decode_body(response).await?;
    debug!(job_id = %created.id, "Search job created");
    Ok(created.id)
}

/// Poll a job once.
///
/// Status polls are never retried here; the caller's poll loop owns cadence.
/// HTTP 429 yields [`JobStatus::rate_limited`] instead of an error.
pub async fn get_job_status(
    client: &Client,
    endpoint: &str,
    credentials: &Credentials,
    job_id: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<JobStatus> {
    let url = format!("{}/search/jobs/{}", endpoint, encode_path_segment(job_id));
    let builder = authorized(client.get(&url), credentials);
    let response = send_once(builder, "/search/jobs/{id}", "GET", metrics).await?;

    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        debug!(job_id, "Status poll rate limited");
        return Ok(JobStatus::rate_limited());
    }
    if !response.status().is_success() {
        let err = api_error_from_response(response).await;
        if let Some(m) = metrics {
            m.record_client_error("/search/jobs/{id}", "GET", &err);
        }
        return Err(err);
    }

    let raw: JobStatusResponse = decode_body(response).await?;
    JobStatus::try_from(raw)
}

/// Fetch one page of aggregate records.
#[allow(clippy::too_many_arguments)]
pub async fn get_records(
    client: &Client,
    endpoint: &str,
    credentials: &Credentials,
    job_id: &str,
    offset: usize,
    limit: usize,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<RecordSet> {
    debug!(job_id, offset, limit, "Fetching records page");

    let url = format!(
        "{}/search/jobs/{}/records",
        endpoint,
        encode_path_segment(job_id)
    );
    let builder = authorized(client.get(&url), credentials)
        .query(&[("offset", offset), ("limit", limit)]);
    let response = send_request_with_retry(
        builder,
        max_retries,
        "/search/jobs/{id}/records",
        "GET",
        metrics,
    )
    .await?;

    let page: RecordsResponse = decode_body(response).await?;
    Ok(page.into_records())
}

/// Delete a job so the service stops working on it.
pub async fn delete_job(
    client: &Client,
    endpoint: &str,
    credentials: &Credentials,
    job_id: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<()> {
    let url = format!("{}/search/jobs/{}", endpoint, encode_path_segment(job_id));
    let builder = authorized(client.delete(&url), credentials);
    send_request_with_retry(builder, max_retries, "/search/jobs/{id}", "DELETE", metrics).await?;
    debug!(job_id, "Search job deleted");
    Ok(())
}
