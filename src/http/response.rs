//! HTTP response writing module
//!
//! Writes the small canned responses (errors, redirects, 304) into a sink.

use hyper::header::{self, HeaderValue};
use hyper::{StatusCode, Uri};
use std::io;

use super::sink::ResponseSink;

pub const PLAIN_TEXT: &str = "text/plain; charset=utf-8";
pub const HTML: &str = "text/html; charset=utf-8";

/// Body text for an error status, e.g. `404 page not found\n`
pub fn error_text(status: StatusCode) -> String {
    match status {
        StatusCode::NOT_FOUND => "404 page not found\n".to_string(),
        _ => format!(
            "{} {}\n",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        ),
    }
}

/// Write a plain-text error response
pub fn write_error(sink: &mut dyn ResponseSink, status: StatusCode) -> io::Result<()> {
    let headers = sink.headers_mut();
    // Validators describe a file we are not sending
    headers.remove(header::ETAG);
    headers.remove(header::LAST_MODIFIED);
    headers.remove(header::CONTENT_LENGTH);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(PLAIN_TEXT));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    sink.set_status(status);
    sink.write(error_text(status).as_bytes())?;
    Ok(())
}

/// Write a 405 advertising the methods the file server accepts
pub fn write_method_not_allowed(sink: &mut dyn ResponseSink) -> io::Result<()> {
    sink.headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
    write_error(sink, StatusCode::METHOD_NOT_ALLOWED)
}

/// Redirect relative to the current URL, keeping its query string
pub fn write_local_redirect(
    sink: &mut dyn ResponseSink,
    uri: &Uri,
    target: &str,
) -> io::Result<()> {
    let location = match uri.query() {
        Some(query) => format!("{target}?{query}"),
        None => target.to_string(),
    };
    let Ok(location) = HeaderValue::from_str(&location) else {
        return write_error(sink, StatusCode::BAD_REQUEST);
    };
    sink.headers_mut().insert(header::LOCATION, location);
    sink.set_status(StatusCode::MOVED_PERMANENTLY);
    Ok(())
}

/// Write 304 Not Modified, which carries no body or content headers
pub fn write_not_modified(sink: &mut dyn ResponseSink) {
    let headers = sink.headers_mut();
    headers.remove(header::CONTENT_TYPE);
    headers.remove(header::CONTENT_LENGTH);
    sink.set_status(StatusCode::NOT_MODIFIED);
}

/// Map a filesystem error onto the status a client should see
pub fn status_for_io_error(err: &io::Error) -> StatusCode {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => StatusCode::NOT_FOUND,
        io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
