//! Request, response and record types for the Sumo Logic APIs.

mod job;
mod metrics_query;
mod record;
mod search;

pub use job::{CreateJobResponse, Job, JobState, JobStatus, JobStatusResponse};
pub use metrics_query::{
    MetricsErrorDetail, MetricsErrorPayload, MetricsQuery, MetricsRequest, TimeRange,
    TimeRangeBoundary,
};
pub use record::{
    Record, RecordEnvelope, RecordSet, RecordsResponse, TIMESLICE_FIELD, format_epoch_millis,
    format_timeslices, timeslice_label,
};
pub use search::{SearchOptions, SearchRequest};
