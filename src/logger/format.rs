//! Access log format module
//!
//! One line per request:
//! `<remote-addr> <method> <url> <status> "<user-agent>" <latency>`

use std::fmt;
use std::time::Duration;

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client address (`ip:port`), `-` when unknown
    pub remote_addr: String,
    /// HTTP method (GET, HEAD, ...)
    pub method: String,
    /// Request URI path plus query
    pub url: String,
    /// Captured status code, 0 if the handler never set one
    pub status: u16,
    /// User-Agent header, empty when absent
    pub user_agent: String,
    /// Time spent in the inner handler
    pub latency: Duration,
}

impl AccessLogEntry {
    pub fn new(remote_addr: String, method: String, url: String) -> Self {
        Self {
            remote_addr,
            method,
            url,
            status: 0,
            user_agent: String::new(),
            latency: Duration::ZERO,
        }
    }
}

impl fmt::Display for AccessLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} \"{}\" ",
            self.remote_addr, self.method, self.url, self.status, self.user_agent,
        )?;
        write_latency(f, self.latency)
    }
}

/// Human-readable latency: `Debug` style below a minute (`1.5ms`, `2.5s`),
/// then hours and minutes with a seconds remainder (`1m30s`, `1h0m2.5s`)
fn write_latency(f: &mut fmt::Formatter<'_>, latency: Duration) -> fmt::Result {
    let secs = latency.as_secs();
    if secs < 60 {
        return write!(f, "{latency:?}");
    }

    let hours = secs / 3600;
    if hours > 0 {
        write!(f, "{hours}h")?;
    }
    write!(f, "{}m{}", secs / 60 % 60, secs % 60)?;

    let nanos = latency.subsec_nanos();
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        write!(f, ".{}", fraction.trim_end_matches('0'))?;
    }
    f.write_str("s")
}
