//! Metrics Query API endpoint (`POST /metricsQueries`).

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use sumo_config::Credentials;
use tracing::debug;

use crate::endpoints::request::{authorized, send_request_with_retry};
use crate::endpoints::search_jobs::decode_body;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{MetricsErrorPayload, MetricsRequest};

/// Run a metrics query synchronously and return the raw response document.
///
/// A 2xx body that carries only an error payload (an `errors` list and no
/// `queryResult`) is reported as [`ClientError::MetricsQueryFailed`].
#[allow(clippy::too_many_arguments)]
pub async fn run_metrics_query(
    client: &Client,
    endpoint: &str,
    credentials: &Credentials,
    request: &MetricsRequest,
    timeout: Duration,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Value> {
    debug!(
        queries = request.queries.len(),
        "Running metrics query"
    );

    let url = format!("{}/metricsQueries", endpoint);
    let builder = authorized(client.post(&url), credentials)
        .timeout(timeout)
        .json(request);
    let response =
        send_request_with_retry(builder, max_retries, "/metricsQueries", "POST", metrics).await?;

    let body: Value = decode_body(response).await?;

    if body.get("queryResult").is_none()
        && body.get("errors").is_some()
        && let Ok(payload) = serde_json::from_value::<MetricsErrorPayload>(body.clone())
    {
        return Err(ClientError::MetricsQueryFailed {
            id: payload.id.clone(),
            message: payload.joined(),
        });
    }

    Ok(body)
}
