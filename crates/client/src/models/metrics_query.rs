//! Metrics query request and error payloads.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::search::iso8601;
use crate::client::cache::fingerprint;
use crate::error::Result;

/// Body of `POST /metricsQueries`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRequest {
    pub queries: Vec<MetricsQuery>,
    pub time_range: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsQuery {
    pub query: String,
    pub row_id: String,
}

/// Time range for a metrics query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TimeRange {
    BeginBoundedTimeRange {
        from: TimeRangeBoundary,
        #[serde(skip_serializing_if = "Option::is_none")]
        to: Option<TimeRangeBoundary>,
    },
}

impl TimeRange {
    /// Absolute range between two instants.
    pub fn between<Tz: TimeZone>(from: DateTime<Tz>, to: DateTime<Tz>) -> Self {
        Self::BeginBoundedTimeRange {
            from: TimeRangeBoundary::iso8601(&from),
            to: Some(TimeRangeBoundary::iso8601(&to)),
        }
    }

    /// Open-ended range starting at `from`.
    pub fn since(from: TimeRangeBoundary) -> Self {
        Self::BeginBoundedTimeRange { from, to: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TimeRangeBoundary {
    Iso8601TimeRangeBoundary {
        #[serde(rename = "iso8601Time")]
        iso8601_time: String,
    },
    EpochTimeRangeBoundary {
        #[serde(rename = "epochMillis")]
        epoch_millis: i64,
    },
    /// Relative to now, e.g. `-15m`.
    RelativeTimeRangeBoundary {
        #[serde(rename = "relativeTime")]
        relative_time: String,
    },
}

impl TimeRangeBoundary {
    pub fn iso8601<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self::Iso8601TimeRangeBoundary {
            iso8601_time: iso8601(at),
        }
    }

    pub fn relative(expr: impl Into<String>) -> Self {
        Self::RelativeTimeRangeBoundary {
            relative_time: expr.into(),
        }
    }
}

impl MetricsRequest {
    /// Build a request from query strings, dropping blank ones.
    ///
    /// Row ids are assigned `A`, `B`, ... `Z`, `AA`, `AB`, ... in order.
    pub fn new<I, S>(queries: I, time_range: TimeRange) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queries = queries
            .into_iter()
            .map(Into::into)
            .filter(|q: &String| !q.trim().is_empty())
            .enumerate()
            .map(|(i, query)| MetricsQuery {
                query,
                row_id: row_id(i),
            })
            .collect();
        Self {
            queries,
            time_range,
        }
    }

    pub fn fingerprint(&self) -> Result<String> {
        fingerprint("metrics", self)
    }
}

fn row_id(index: usize) -> String {
    let mut n = index + 1;
    let mut id = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        id.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    id.reverse();
    String::from_utf8_lossy(&id).into_owned()
}

/// Structured error body from the metrics endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsErrorPayload {
    #[serde(default)]
    pub id: String,
    pub errors: Vec<MetricsErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsErrorDetail {
    pub code: String,
    pub message: String,
}

impl MetricsErrorPayload {
    /// One line per error: `code: message`.
    pub fn joined(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        let req = MetricsRequest::new(["metric=CPU_Total", "  ", "metric=Mem_Used"], TimeRange::between(from, to));

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "queries": [
                    {"query": "metric=CPU_Total", "rowId": "A"},
                    {"query": "metric=Mem_Used", "rowId": "B"}
                ],
                "timeRange": {
                    "type": "BeginBoundedTimeRange",
                    "from": {"type": "Iso8601TimeRangeBoundary", "iso8601Time": "2024-01-01T00:00:00Z"},
                    "to": {"type": "Iso8601TimeRangeBoundary", "iso8601Time": "2024-01-01T01:00:00Z"}
                }
            })
        );
    }

    #[test]
    fn test_relative_open_range() {
        let range = TimeRange::since(TimeRangeBoundary::relative("-15m"));
        assert_eq!(
            serde_json::to_value(&range).unwrap(),
            json!({
                "type": "BeginBoundedTimeRange",
                "from": {"type": "RelativeTimeRangeBoundary", "relativeTime": "-15m"}
            })
        );
    }

    #[test]
    fn test_row_ids() {
        assert_eq!(row_id(0), "A");
        assert_eq!(row_id(25), "Z");
        assert_eq!(row_id(26), "AA");
        assert_eq!(row_id(27), "AB");
    }

    #[test]
    fn test_error_payload_joined() {
        let payload: MetricsErrorPayload = serde_json::from_value(json!({
            "id": "IUUQI-DGH5I-TJ045",
            "errors": [
                {"code": "metrics:query_error", "message": "Unknown operator"},
                {"code": "metrics:time_range", "message": "Range too large"}
            ]
        }))
        .unwrap();

        assert_eq!(
            payload.joined(),
            "metrics:query_error: Unknown operator\nmetrics:time_range: Range too large"
        );
    }
}
