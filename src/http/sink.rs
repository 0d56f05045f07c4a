//! Response sink module
//!
//! Handlers never build a `hyper::Response` directly. They write into a
//! [`ResponseSink`], which middlewares may decorate, and the connection layer
//! turns the final [`ResponseBuffer`] into the response sent on the wire.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Response, StatusCode};
use std::io;

use crate::logger;

/// Write side of an HTTP response
pub trait ResponseSink: Send {
    /// Response headers; changes after the first write may be ignored by the sink
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Set the status code explicitly
    fn set_status(&mut self, status: StatusCode);

    /// Append body bytes, returning how many were accepted
    ///
    /// Writing without a prior [`set_status`](Self::set_status) implies `200 OK`.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
}

/// In-memory sink collecting status, headers and body of one response
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status committed so far, `None` until set or first written
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Convert into the response sent to the client
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }

    /// Discard anything written and answer with a plain error instead
    ///
    /// Headers unrelated to the discarded body are kept.
    pub fn into_failure_response(mut self, status: StatusCode) -> Response<Full<Bytes>> {
        for name in [
            header::CONTENT_LENGTH,
            header::CONTENT_RANGE,
            header::ETAG,
            header::LAST_MODIFIED,
            header::ACCEPT_RANGES,
        ] {
            self.headers.remove(name);
        }
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(super::response::PLAIN_TEXT),
        );
        self.body = super::response::error_text(status).into_bytes();
        self.status = Some(status);
        self.into_response()
    }
}

impl ResponseSink for ResponseBuffer {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn set_status(&mut self, status: StatusCode) {
        if let Some(current) = self.status {
            logger::log_warning(&format!(
                "Superfluous status {status} ignored, response already committed with {current}"
            ));
            return;
        }
        self.status = Some(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}
