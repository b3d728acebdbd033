//! Percent-encoding for identifiers interpolated into API paths.
//!
//! Job ids come back from the service, but they are still encoded before being
//! placed in `/search/jobs/{id}` so a malformed id can never change the path.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

/// Everything except RFC 3986 unreserved characters is encoded.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a string for use as a single URL path segment.
///
/// ```
/// use sumo_client::endpoints::encode_path_segment;
///
/// assert_eq!(encode_path_segment("6B1C5E0C2A4D7F11"), "6B1C5E0C2A4D7F11");
/// assert_eq!(encode_path_segment("../records"), "..%2Frecords");
/// ```
pub fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), PATH_SEGMENT_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_ids_pass_through() {
        assert_eq!(encode_path_segment("J1"), "J1");
        assert_eq!(encode_path_segment("7A3D-98F1_x.y~z"), "7A3D-98F1_x.y~z");
    }

    #[test]
    fn test_path_characters_encoded() {
        assert_eq!(encode_path_segment("a/b"), "a%2Fb");
        assert_eq!(encode_path_segment("a?b#c"), "a%3Fb%23c");
        assert_eq!(encode_path_segment("100%"), "100%25");
        assert_eq!(encode_path_segment("a b"), "a%20b");
    }

    #[test]
    fn test_empty() {
        assert_eq!(encode_path_segment(""), "");
    }
}
