//! Search job methods for [`SumoClient`].
//!
//! # What this module handles:
//! - Building the search request (time window, time zone, query comment)
//! - Serving identical requests from the result cache
//! - Submitting jobs and paging through their records
//!
//! # What this module does NOT handle:
//! - The poll loop and job release (see `running_query`)
//! - Low-level HTTP calls (in [`crate::endpoints`])

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::client::SumoClient;
use crate::client::running_query::RunningQuery;
use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::models::{RecordSet, SearchOptions, SearchRequest};

impl SumoClient {
    /// Run a search and return its aggregate records.
    ///
    /// Results of completed jobs are cached under the request fingerprint for
    /// the search TTL. A job that times out or is cancelled still returns the
    /// rows it produced, but those rows are not cached. Concurrent calls with
    /// the same fingerprint share one backend job.
    ///
    /// # Errors
    ///
    /// - Submission answered with anything but 202, or an undecodable body
    /// - A status poll reported an unknown state or failed
    /// - A records page failed after retries
    pub async fn query(&self, search_text: &str, options: SearchOptions) -> Result<RecordSet> {
        let request = self.search_request(search_text, &options, Utc::now());
        let key = request.fingerprint()?;

        self.search_cache
            .get_or_try_insert_with(&key, async {
                let job_id = self.submit_search_job(&request).await?;
                let outcome = RunningQuery::new(self, job_id).run().await?;
                let ttl = if outcome.completed {
                    self.search_ttl
                } else {
                    Duration::ZERO
                };
                Ok::<_, ClientError>((outcome.records, ttl))
            })
            .await
            .map_err(ClientError::from_shared)
    }

    /// Build the request body a query would submit at `now`.
    pub fn search_request(
        &self,
        search_text: &str,
        options: &SearchOptions,
        now: DateTime<Utc>,
    ) -> SearchRequest {
        let query = match &self.query_comment {
            Some(comment) => format!("// {comment}\n{search_text}"),
            None => search_text.to_string(),
        };
        let (from, to) = options.window(now);
        let time_zone = options
            .time_zone
            .clone()
            .unwrap_or_else(|| self.default_time_zone.clone());

        SearchRequest::new(query, from, to, time_zone)
    }

    /// Submit a search job and return its id.
    pub async fn submit_search_job(&self, request: &SearchRequest) -> Result<String> {
        endpoints::create_job(
            &self.http,
            &self.endpoint,
            &self.credentials,
            request,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Page through a job's records up to the client's record limit.
    ///
    /// Pages are `min(records_page_size, record_limit)` rows. Paging stops at the
    /// first short page or once the limit is reached; the result never exceeds it.
    pub async fn fetch_records(&self, job_id: &str) -> Result<RecordSet> {
        let limit = self.record_limit;
        let page_size = self.records_page_size.min(limit);
        let mut records = RecordSet::new();

        loop {
            if !records.is_empty() && !self.page_throttle.is_zero() {
                tokio::time::sleep(self.page_throttle).await;
            }

            let page = endpoints::get_records(
                &self.http,
                &self.endpoint,
                &self.credentials,
                job_id,
                records.len(),
                page_size,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await?;

            let page_len = page.len();
            records.extend(page);
            debug!(job_id, page_len, total = records.len(), "Fetched records page");

            if page_len < page_size || records.len() >= limit {
                break;
            }
        }

        records.truncate(limit);
        Ok(records)
    }
}
