//! Static file serving module
//!
//! Resolves request paths under a document root and writes files, index
//! pages, directory listings, redirects and error responses into the sink.

use chrono::{DateTime, Utc};
use hyper::header::{self, HeaderName, HeaderValue};
use hyper::{Method, Request, StatusCode};
use std::fmt::Write as _;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::Handler;
use crate::http::path::{self as url_path, encode_segment, escape_html};
use crate::http::range::RangeParseResult;
use crate::http::response::{self, status_for_io_error};
use crate::http::{cache, mime, parse_range_header, ResponseSink};
use crate::logger;

const INDEX_FILE: &str = "index.html";

/// Serves the files under a document root
#[derive(Debug, Clone)]
pub struct FileServer {
    root: PathBuf,
}

impl FileServer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Canonical path and metadata of a request target, kept inside the root
    async fn resolve(&self, relative: &Path) -> Result<(PathBuf, Metadata), StatusCode> {
        let root = fs::canonicalize(&self.root).await.map_err(|e| {
            logger::log_warning(&format!(
                "Document root not found or inaccessible '{}': {e}",
                self.root.display()
            ));
            StatusCode::NOT_FOUND
        })?;

        // File not found is common (404), no need to log it
        let target = fs::canonicalize(self.root.join(relative))
            .await
            .map_err(|e| status_for_io_error(&e))?;
        if !target.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                relative.display(),
                target.display()
            ));
            return Err(StatusCode::FORBIDDEN);
        }

        let metadata = fs::metadata(&target)
            .await
            .map_err(|e| status_for_io_error(&e))?;
        Ok((target, metadata))
    }
}

impl Handler for FileServer {
    async fn serve(&self, req: &mut Request<()>, sink: &mut dyn ResponseSink) -> io::Result<()> {
        let is_head = match *req.method() {
            Method::GET => false,
            Method::HEAD => true,
            _ => return response::write_method_not_allowed(sink),
        };

        let path = req.uri().path();
        let relative = match url_path::sanitize(path) {
            Ok(relative) => relative,
            Err(e) => {
                logger::log_warning(&format!("Rejected request path '{path}': {e}"));
                return response::write_error(sink, StatusCode::BAD_REQUEST);
            }
        };

        let (target, metadata) = match self.resolve(&relative).await {
            Ok(resolved) => resolved,
            Err(status) => return response::write_error(sink, status),
        };

        if !metadata.is_dir() {
            return serve_file(req, sink, &target, &metadata, is_head).await;
        }

        if !path.ends_with('/') {
            let name = path.rsplit('/').next().unwrap_or_default();
            return response::write_local_redirect(sink, req.uri(), &format!("{name}/"));
        }

        let index = target.join(INDEX_FILE);
        match fs::metadata(&index).await {
            Ok(index_metadata) if index_metadata.is_file() => {
                serve_file(req, sink, &index, &index_metadata, is_head).await
            }
            _ => serve_listing(sink, &target, is_head).await,
        }
    }
}

fn set_header(sink: &mut dyn ResponseSink, name: HeaderName, value: &str) -> io::Result<()> {
    let value = HeaderValue::from_str(value).map_err(io::Error::other)?;
    sink.headers_mut().insert(name, value);
    Ok(())
}

/// Write a regular file, honoring validators and a single byte range
async fn serve_file(
    req: &Request<()>,
    sink: &mut dyn ResponseSink,
    path: &Path,
    metadata: &Metadata,
    is_head: bool,
) -> io::Result<()> {
    let content = match fs::read(path).await {
        Ok(content) => content,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return response::write_error(sink, status_for_io_error(&e));
        }
    };

    let etag = cache::generate_etag(&content);
    let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
    set_header(sink, header::ETAG, &etag)?;
    if let Some(modified) = modified {
        set_header(sink, header::LAST_MODIFIED, &cache::format_http_date(modified))?;
    }

    if cache::is_not_modified(req.headers(), &etag, modified) {
        response::write_not_modified(sink);
        return Ok(());
    }

    let headers = sink.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(mime::content_type_for(path, &content)),
    );
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    let total = content.len();
    let range_header = if cache::range_applies(req.headers(), &etag, modified) {
        req.headers()
            .get(header::RANGE)
            .and_then(|v| v.to_str().ok())
    } else {
        None
    };

    match parse_range_header(range_header, total) {
        RangeParseResult::Valid(range) => {
            set_header(sink, header::CONTENT_RANGE, &range.content_range(total))?;
            sink.headers_mut()
                .insert(header::CONTENT_LENGTH, HeaderValue::from(range.content_length()));
            sink.set_status(StatusCode::PARTIAL_CONTENT);
            if !is_head {
                sink.write(&content[range.start..=range.end])?;
            }
        }
        RangeParseResult::NotSatisfiable => {
            set_header(sink, header::CONTENT_RANGE, &format!("bytes */{total}"))?;
            return response::write_error(sink, StatusCode::RANGE_NOT_SATISFIABLE);
        }
        RangeParseResult::None => {
            sink.headers_mut()
                .insert(header::CONTENT_LENGTH, HeaderValue::from(total));
            if is_head {
                sink.set_status(StatusCode::OK);
            } else {
                // No explicit status: the first write implies 200
                sink.write(&content)?;
            }
        }
    }
    Ok(())
}

/// Write an HTML listing of a directory without an index page
async fn serve_listing(sink: &mut dyn ResponseSink, dir: &Path, is_head: bool) -> io::Result<()> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_error(&format!("Failed to list '{}': {e}", dir.display()));
            return response::write_error(sink, status_for_io_error(&e));
        }
    };

    let mut names = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let mut name = entry.file_name().to_string_lossy().into_owned();
                if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
                    name.push('/');
                }
                names.push(name);
            }
            Ok(None) => break,
            Err(e) => {
                logger::log_error(&format!("Failed to list '{}': {e}", dir.display()));
                return response::write_error(sink, StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }
    names.sort();

    let body = render_listing(&names);
    let headers = sink.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(response::HTML));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    if is_head {
        sink.set_status(StatusCode::OK);
    } else {
        sink.write(body.as_bytes())?;
    }
    Ok(())
}

fn render_listing(names: &[String]) -> String {
    let mut html = String::from(
        "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n",
    );
    for name in names {
        let href = match name.strip_suffix('/') {
            Some(dir) => format!("{}/", encode_segment(dir)),
            None => encode_segment(name),
        };
        let _ = writeln!(
            html,
            "<a href=\"{}\">{}</a>",
            escape_html(&href),
            escape_html(name)
        );
    }
    html.push_str("</pre>\n");
    html
}
