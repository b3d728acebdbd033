//! Metrics query methods for [`SumoClient`].

use serde_json::Value;

use crate::client::SumoClient;
use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::models::{MetricsRequest, TimeRange};

impl SumoClient {
    /// Run metrics queries over a time range and return the raw response.
    ///
    /// Blank query strings are dropped and the rest get row ids `A`, `B`, ...
    /// Responses are cached for the metrics TTL.
    pub async fn metrics_query<I, S>(&self, queries: I, time_range: TimeRange) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = MetricsRequest::new(queries, time_range);
        self.run_metrics_request(&request).await
    }

    /// Run a prepared metrics request, through the cache.
    pub async fn run_metrics_request(&self, request: &MetricsRequest) -> Result<Value> {
        let key = request.fingerprint()?;

        self.metrics_cache
            .get_or_try_insert_with(&key, async {
                let body = endpoints::run_metrics_query(
                    &self.metrics_http,
                    &self.endpoint,
                    &self.credentials,
                    request,
                    self.metrics_timeout,
                    self.max_retries,
                    self.metrics.as_ref(),
                )
                .await?;
                Ok::<_, ClientError>((body, self.metrics_ttl))
            })
            .await
            .map_err(ClientError::from_shared)
    }
}
