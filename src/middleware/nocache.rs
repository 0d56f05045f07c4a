//! No-cache middleware
//!
//! Forces every response to be fetched fresh: cache validators are removed
//! from the request so the file server can never answer 304, and headers
//! forbidding caching are added to the response.

use hyper::header::{HeaderMap, HeaderValue};
use hyper::Request;
use std::io;

use crate::handler::Handler;
use crate::http::ResponseSink;

/// `Expires` value: the Unix epoch as an HTTP date
pub const EPOCH: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Response headers set on every response
pub const NO_CACHE_HEADERS: [(&str, &str); 4] = [
    ("expires", EPOCH),
    ("cache-control", "no-cache, private, max-age=0"),
    ("pragma", "no-cache"),
    ("x-accel-expires", "0"),
];

/// Request headers that would enable a conditional response
pub const VALIDATOR_HEADERS: [&str; 6] = [
    "etag",
    "if-modified-since",
    "if-match",
    "if-none-match",
    "if-range",
    "if-unmodified-since",
];

/// Wraps a handler so nothing it serves can be cached
#[derive(Debug, Clone)]
pub struct NoCache<H> {
    inner: H,
}

impl<H> NoCache<H> {
    pub const fn new(inner: H) -> Self {
        Self { inner }
    }
}

pub fn strip_validators(headers: &mut HeaderMap) {
    for name in VALIDATOR_HEADERS {
        headers.remove(name);
    }
}

pub fn set_no_cache_headers(headers: &mut HeaderMap) {
    for (name, value) in NO_CACHE_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

impl<H: Handler> Handler for NoCache<H> {
    async fn serve(&self, req: &mut Request<()>, sink: &mut dyn ResponseSink) -> io::Result<()> {
        strip_validators(req.headers_mut());
        set_no_cache_headers(sink.headers_mut());
        self.inner.serve(req, sink).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::cache::format_http_date;
    use crate::http::ResponseBuffer;
    use chrono::{DateTime, Utc};
    use hyper::header;
    use hyper::StatusCode;
    use std::sync::Mutex;

    /// Records the headers it was called with, then writes a body
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Option<HeaderMap>>,
    }

    impl Handler for Recorder {
        async fn serve(
            &self,
            req: &mut Request<()>,
            sink: &mut dyn ResponseSink,
        ) -> io::Result<()> {
            *self.seen.lock().unwrap() = Some(req.headers().clone());
            sink.write(b"fresh")?;
            Ok(())
        }
    }

    fn request_with_validators() -> Request<()> {
        Request::builder()
            .uri("/index.html")
            .header("ETag", "\"abc\"")
            .header("If-Modified-Since", EPOCH)
            .header("If-Match", "\"abc\"")
            .header("If-None-Match", "\"abc\"")
            .header("If-Range", "\"abc\"")
            .header("If-Unmodified-Since", EPOCH)
            .header("Accept", "text/html")
            .body(())
            .unwrap()
    }

    #[test]
    fn test_epoch_is_http_date_of_unix_epoch() {
        assert_eq!(format_http_date(DateTime::<Utc>::UNIX_EPOCH), EPOCH);
    }

    #[tokio::test]
    async fn test_strips_validators_before_inner() {
        let middleware = NoCache::new(Recorder::default());
        let mut req = request_with_validators();
        let mut buffer = ResponseBuffer::new();
        middleware.serve(&mut req, &mut buffer).await.unwrap();

        let seen = middleware.inner.seen.lock().unwrap().take().unwrap();
        for name in VALIDATOR_HEADERS {
            assert!(!seen.contains_key(name), "{name} reached the handler");
        }
        assert_eq!(seen[header::ACCEPT], "text/html");
    }

    #[tokio::test]
    async fn test_sets_no_cache_headers() {
        let middleware = NoCache::new(Recorder::default());
        let mut req = Request::builder().uri("/").body(()).unwrap();
        let mut buffer = ResponseBuffer::new();
        buffer
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=3600"));
        middleware.serve(&mut req, &mut buffer).await.unwrap();

        let headers = buffer.headers();
        assert_eq!(headers[header::EXPIRES], "Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache, private, max-age=0");
        assert_eq!(headers[header::PRAGMA], "no-cache");
        assert_eq!(headers["x-accel-expires"], "0");
        assert_eq!(headers.get_all(header::CACHE_CONTROL).iter().count(), 1);
        assert_eq!(buffer.status(), Some(StatusCode::OK));
        assert_eq!(buffer.body(), b"fresh");
    }
}
