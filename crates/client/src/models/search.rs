//! Search job request types.

use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, TimeZone, Utc};
use serde::Serialize;

use crate::client::cache::fingerprint;
use crate::error::Result;
use sumo_config::constants::DEFAULT_SEARCH_WINDOW_HOURS;

/// Body of `POST /search/jobs`.
///
/// Timestamps are rendered in UTC with second precision so that equal
/// instants always produce the same body, and therefore the same fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub from: String,
    pub to: String,
    pub time_zone: String,
}

impl SearchRequest {
    pub fn new<Tz: TimeZone>(
        query: impl Into<String>,
        from: DateTime<Tz>,
        to: DateTime<Tz>,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            from: iso8601(&from),
            to: iso8601(&to),
            time_zone: time_zone.into(),
        }
    }

    /// Cache key for this request.
    pub fn fingerprint(&self) -> Result<String> {
        fingerprint("search", self)
    }
}

pub(crate) fn iso8601<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Per-call overrides for a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub time_zone: Option<String>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_from<Tz: TimeZone>(mut self, from: DateTime<Tz>) -> Self {
        self.from = Some(from.with_timezone(&Utc));
        self
    }

    pub fn with_to<Tz: TimeZone>(mut self, to: DateTime<Tz>) -> Self {
        self.to = Some(to.with_timezone(&Utc));
        self
    }

    pub fn with_time_zone(mut self, tz: impl Into<String>) -> Self {
        self.time_zone = Some(tz.into());
        self
    }

    /// Resolve the time window, defaulting to the last 24 hours ending `now`.
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let to = self.to.unwrap_or(now);
        let from = self
            .from
            .unwrap_or(to - ChronoDuration::hours(DEFAULT_SEARCH_WINDOW_HOURS));
        (from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_body_uses_camel_case_time_zone() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let req = SearchRequest::new("_sourceCategory=prod | count", from, to, "UTC");

        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["timeZone"], "UTC");
        assert_eq!(body["from"], "2024-01-01T00:00:00Z");
        assert_eq!(body["to"], "2024-01-02T00:00:00Z");
    }

    #[test]
    fn test_equal_instants_in_different_offsets_normalize() {
        let utc = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let plus_ten = FixedOffset::east_opt(10 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 22, 0, 0)
            .unwrap();

        let a = SearchRequest::new("foo", utc, utc, "UTC");
        let b = SearchRequest::new("foo", plus_ten, plus_ten, "UTC");
        assert_eq!(a, b);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_default_window_is_last_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap();
        let (from, to) = SearchOptions::new().window(now);
        assert_eq!(to, now);
        assert_eq!(to - from, ChronoDuration::hours(24));
    }

    #[test]
    fn test_window_honours_overrides() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();
        let (from, resolved_to) = SearchOptions::new().with_to(to).window(now);
        assert_eq!(resolved_to, to);
        assert_eq!(from, to - ChronoDuration::hours(24));
    }
}
