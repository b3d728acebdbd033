//! Request execution with retry for transient failures.
//!
//! # What this module handles:
//! - Attaching basic auth and trace context to every request
//! - Retrying 429/502/503/504 and connect/timeout errors with exponential backoff
//! - Turning non-success responses into [`ClientError::ApiError`] with the
//!   Sumo Logic error body flattened into the message
//! - Recording request metrics
//!
//! # What this module does NOT handle:
//! - Search job status polling cadence (see [`crate::client::backoff`])
//! - Decoding success bodies (callers decode into their own models)

use std::time::{Duration, Instant};

use reqwest::{RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Deserialize;
use sumo_config::Credentials;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::MetricsErrorPayload;
use crate::tracing::inject_trace_context;

/// Attach basic auth (access id / access key) to a request.
pub(crate) fn authorized(builder: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
    builder.basic_auth(
        &credentials.access_id,
        Some(credentials.access_key.expose_secret()),
    )
}

/// Generic Sumo Logic error body: `{"status": 400, "id": "...", "code": "...", "message": "..."}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Flatten an error body into `(message, request_id)`.
///
/// Metrics errors (`{id, errors: [{code, message}]}`) are joined one per line;
/// generic errors become `code: message`; anything else is returned verbatim.
pub(crate) fn describe_error_body(body: &str) -> (String, Option<String>) {
    if let Ok(payload) = serde_json::from_str::<MetricsErrorPayload>(body) {
        let id = Some(payload.id.clone()).filter(|id| !id.is_empty());
        return (payload.joined(), id);
    }

    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        let message = match (parsed.code, parsed.message) {
            (Some(code), Some(message)) => Some(format!("{code}: {message}")),
            (None, Some(message)) => Some(message),
            (Some(code), None) => Some(code),
            (None, None) => None,
        };
        if let Some(message) = message {
            return (message, parsed.id);
        }
    }

    (body.to_string(), None)
}

/// Consume a non-success response into an [`ClientError::ApiError`].
pub(crate) async fn api_error_from_response(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let (message, request_id) = describe_error_body(&body);
    ClientError::ApiError {
        status,
        url,
        message,
        request_id,
    }
}

/// Send a request exactly once, recording metrics and attaching trace context.
///
/// Any HTTP status is returned as `Ok`; only transport failures are errors.
pub(crate) async fn send_once(
    builder: RequestBuilder,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let builder = inject_trace_context(builder);
    let started = Instant::now();

    if let Some(m) = metrics {
        m.record_request(endpoint, method);
    }

    match builder.send().await {
        Ok(response) => {
            if let Some(m) = metrics {
                m.record_request_duration(
                    endpoint,
                    method,
                    started.elapsed(),
                    Some(response.status().as_u16()),
                );
            }
            Ok(response)
        }
        Err(e) => {
            let err = ClientError::from(e);
            if let Some(m) = metrics {
                m.record_request_duration(endpoint, method, started.elapsed(), None);
                m.record_client_error(endpoint, method, &err);
            }
            Err(err)
        }
    }
}

/// Sends a request, retrying transient failures with exponential backoff
/// (1s, 2s, 4s = 2^attempt).
///
/// `max_retries` counts retries after the first attempt; 0 means a single
/// attempt. Non-retryable failures are returned immediately.
///
/// # Errors
///
/// - [`ClientError::ApiError`] for a non-retryable, non-success status
/// - [`ClientError::MaxRetriesExceeded`] wrapping the last failure when retries run out
/// - [`ClientError::HttpError`] for non-retryable transport failures
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let mut attempt = 0usize;

    loop {
        let Some(attempt_builder) = builder.try_clone() else {
            debug!("Request builder cannot be cloned, single attempt only");
            return finish(
                send_once(builder, endpoint, method, metrics).await?,
                endpoint,
                method,
                metrics,
            )
            .await;
        };

        let outcome = match send_once(attempt_builder, endpoint, method, metrics).await {
            Ok(response) => finish(response, endpoint, method, metrics).await,
            Err(e) => Err(e),
        };

        let err = match outcome {
            Ok(response) => {
                if attempt > 0 {
                    debug!(attempt = attempt + 1, endpoint, "Request succeeded after retry");
                }
                return Ok(response);
            }
            Err(e) if e.is_retryable() => e,
            Err(e) => return Err(e),
        };

        if attempt >= max_retries {
            if max_retries == 0 {
                return Err(err);
            }
            debug!(attempts = attempt + 1, endpoint, "Retries exhausted");
            return Err(ClientError::MaxRetriesExceeded(attempt + 1, Box::new(err)));
        }

        let backoff = Duration::from_secs(2u64.pow(attempt as u32));
        debug!(
            attempt = attempt + 1,
            max_attempts = max_retries + 1,
            backoff_secs = backoff.as_secs(),
            error = %err,
            "Transient failure, retrying"
        );
        if let Some(m) = metrics {
            m.record_retry(endpoint, method, attempt + 1);
        }

        tokio::time::sleep(backoff).await;
        attempt += 1;
    }
}

async fn finish(
    response: Response,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let err = api_error_from_response(response).await;
    if let Some(m) = metrics {
        m.record_client_error(endpoint, method, &err);
    }
    Err(err)
}
