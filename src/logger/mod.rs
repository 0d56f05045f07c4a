//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Access log lines (see [`AccessLogEntry`])
//! - Error and warning logging

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::{LogSink, LogWriter};

use std::net::SocketAddr;
use std::path::Path;

/// Write through the global writer, or straight to stderr before `init()`
fn write_line(message: &str) {
    match writer::get() {
        Some(w) => w.write_line(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_listening(log: &dyn LogSink, addr: &SocketAddr) {
    log.write_line(&format!("Listening '{addr}'..."));
}

pub fn log_document_root(log: &dyn LogSink, path: &Path) {
    log.write_line(&format!("document root '{}'", path.display()));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_line(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_line(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_line(&format!("[WARN] {message}"));
}
