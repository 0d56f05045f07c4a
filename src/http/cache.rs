//! HTTP cache validation module
//!
//! Provides `ETag` generation, HTTP dates and conditional request checks.

use chrono::{DateTime, Utc};
use hyper::header::{self, HeaderMap};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Generate `ETag` using fast hashing
///
/// Returns a quoted `ETag` string, e.g. `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports a single `ETag`, a comma separated list, weak tags and `*`.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').any(|e| {
            let e = e.trim();
            e == "*" || e.strip_prefix("W/").unwrap_or(e) == etag
        })
    })
}

pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Decide whether a GET/HEAD may be answered with 304 Not Modified
///
/// `If-None-Match` takes precedence; `If-Modified-Since` is only consulted
/// when it is absent, and compares at one-second resolution.
pub fn is_not_modified(headers: &HeaderMap, etag: &str, modified: Option<DateTime<Utc>>) -> bool {
    if let Some(if_none_match) = header_str(headers, &header::IF_NONE_MATCH) {
        return check_etag_match(Some(if_none_match), etag);
    }
    let since = header_str(headers, &header::IF_MODIFIED_SINCE).and_then(parse_http_date);
    match (since, modified) {
        (Some(since), Some(modified)) => modified.timestamp() <= since.timestamp(),
        _ => false,
    }
}

/// Whether a `Range` header may be honored under the request's `If-Range`
pub fn range_applies(headers: &HeaderMap, etag: &str, modified: Option<DateTime<Utc>>) -> bool {
    let Some(if_range) = header_str(headers, &header::IF_RANGE) else {
        return true;
    };
    let if_range = if_range.trim();
    if if_range.starts_with('"') {
        return if_range == etag;
    }
    match (parse_http_date(if_range), modified) {
        (Some(date), Some(modified)) => modified.timestamp() == date.timestamp(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hyper::header::HeaderValue;

    fn headers_with(name: header::HeaderName, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag, generate_etag(b"hello world"));
        assert_ne!(etag, generate_etag(b"hello there"));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("W/\"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_http_date_roundtrip_epoch() {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        assert_eq!(format_http_date(epoch), "Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(
            parse_http_date("Thu, 01 Jan 1970 00:00:00 GMT"),
            Some(epoch)
        );
        assert_eq!(parse_http_date("yesterday"), None);
    }

    #[test]
    fn test_not_modified_by_etag() {
        let headers = headers_with(header::IF_NONE_MATCH, "\"abc\"");
        assert!(is_not_modified(&headers, "\"abc\"", None));
        assert!(!is_not_modified(&headers, "\"def\"", None));
    }

    #[test]
    fn test_not_modified_by_date() {
        let modified = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let headers = headers_with(header::IF_MODIFIED_SINCE, "Fri, 01 Mar 2024 12:00:00 GMT");
        assert!(is_not_modified(&headers, "\"x\"", Some(modified)));

        let older = headers_with(header::IF_MODIFIED_SINCE, "Thu, 29 Feb 2024 12:00:00 GMT");
        assert!(!is_not_modified(&older, "\"x\"", Some(modified)));
        assert!(!is_not_modified(&HeaderMap::new(), "\"x\"", Some(modified)));
    }

    #[test]
    fn test_etag_takes_precedence_over_date() {
        let modified = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut headers = headers_with(header::IF_NONE_MATCH, "\"other\"");
        headers.insert(
            header::IF_MODIFIED_SINCE,
            HeaderValue::from_static("Fri, 01 Mar 2024 12:00:00 GMT"),
        );
        assert!(!is_not_modified(&headers, "\"x\"", Some(modified)));
    }

    #[test]
    fn test_range_applies() {
        assert!(range_applies(&HeaderMap::new(), "\"x\"", None));
        assert!(range_applies(&headers_with(header::IF_RANGE, "\"x\""), "\"x\"", None));
        assert!(!range_applies(&headers_with(header::IF_RANGE, "\"y\""), "\"x\"", None));
    }
}
