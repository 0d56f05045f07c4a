//! Request logging middleware
//!
//! Times the inner handler, captures the status it produced and writes one
//! access line per request to the injected [`LogSink`].

use hyper::header::{self, HeaderMap};
use hyper::{Request, StatusCode};
use std::io;
use std::sync::Arc;
use std::time::Instant;

use crate::handler::{ClientAddr, Handler};
use crate::http::ResponseSink;
use crate::logger::{AccessLogEntry, LogSink};

/// Sink decorator recording the status and the size of the latest write
///
/// Only the most recent write's length survives; multi-write responses are
/// not summed.
pub struct CaptureSink<'a> {
    inner: &'a mut dyn ResponseSink,
    status: Option<StatusCode>,
    length: usize,
}

impl<'a> CaptureSink<'a> {
    pub fn new(inner: &'a mut dyn ResponseSink) -> Self {
        Self {
            inner,
            status: None,
            length: 0,
        }
    }

    /// Captured status, `None` if the handler never set or wrote one
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Numeric status for the log line, 0 when unset
    pub fn status_code(&self) -> u16 {
        self.status.map_or(0, |s| s.as_u16())
    }

    /// Length of the most recent write
    pub const fn length(&self) -> usize {
        self.length
    }
}

impl ResponseSink for CaptureSink<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
        self.inner.set_status(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.length = buf.len();
        self.inner.write(buf)
    }
}

/// Wraps a handler and logs every request it serves
pub struct Logging<H> {
    inner: H,
    log: Arc<dyn LogSink>,
}

impl<H> Logging<H> {
    pub fn new(inner: H, log: Arc<dyn LogSink>) -> Self {
        Self { inner, log }
    }
}

fn access_entry(req: &Request<()>, capture: &CaptureSink<'_>) -> AccessLogEntry {
    let remote_addr = req
        .extensions()
        .get::<ClientAddr>()
        .map_or_else(|| "-".to_string(), |addr| addr.0.to_string());
    let mut entry = AccessLogEntry::new(
        remote_addr,
        req.method().to_string(),
        req.uri().to_string(),
    );
    entry.status = capture.status_code();
    entry.user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    entry
}

impl<H: Handler> Handler for Logging<H> {
    async fn serve(&self, req: &mut Request<()>, sink: &mut dyn ResponseSink) -> io::Result<()> {
        let start = Instant::now();
        let mut capture = CaptureSink::new(sink);
        let result = self.inner.serve(req, &mut capture).await;

        let mut entry = access_entry(req, &capture);
        entry.latency = start.elapsed();
        self.log.write_line(&entry.to_string());
        result
    }
}
