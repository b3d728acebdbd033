//! Low-level REST endpoint calls.
//!
//! Each function performs one HTTP exchange (plus transient retries) and maps
//! the response into crate models. Higher-level flows live in [`crate::client`].

mod metrics_queries;
mod request;
mod search_jobs;
mod url_encoding;

pub use metrics_queries::run_metrics_query;
pub use request::send_request_with_retry;
pub use search_jobs::{create_job, delete_job, get_job_status, get_records};
pub use url_encoding::encode_path_segment;
