//! Log writer module
//!
//! Provides thread-safe, timestamped log writing to stderr.

use chrono::Local;
use std::io::{self, Write};
use std::sync::{Arc, OnceLock};

/// Global log writer instance, used for error and warning lines
static LOG_WRITER: OnceLock<Arc<LogWriter>> = OnceLock::new();

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Destination for finished log lines
///
/// Request and startup logging take one of these explicitly so it can be
/// pointed at a buffer in tests.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Log writer prefixing every line with the local time
///
/// Each line is written under the stderr lock, so concurrent requests never
/// interleave within a line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    pub const fn stderr() -> Self {
        Self
    }
}

impl LogSink for LogWriter {
    fn write_line(&self, line: &str) {
        // Nowhere left to report a failing log stream
        let _ = write_line_to(&mut io::stderr().lock(), &format_line(line));
    }
}

fn write_line_to(out: &mut impl Write, line: &str) -> io::Result<()> {
    writeln!(out, "{line}")
}

/// Prefix a message with the current local time
fn format_line(message: &str) -> String {
    format!("{} {message}", Local::now().format(TIMESTAMP_FORMAT))
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
pub fn init(writer: Arc<LogWriter>) -> io::Result<()> {
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if `init()` has been called
pub fn get() -> Option<&'static Arc<LogWriter>> {
    LOG_WRITER.get()
}
