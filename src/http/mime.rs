//! MIME type detection module
//!
//! Picks a Content-Type from the file extension, falling back to a look at
//! the content itself when the extension is unknown.

use std::path::Path;

/// Bytes inspected when sniffing content without a known extension
const SNIFF_LEN: usize = 512;

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use nocache_httpd::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), Some("text/html; charset=utf-8"));
/// assert_eq!(get_content_type(Some("MP4")), Some("video/mp4"));
/// assert_eq!(get_content_type(None), None);
/// ```
pub fn get_content_type(extension: Option<&str>) -> Option<&'static str> {
    let extension = extension?.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" | "md" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "xml" => "text/xml; charset=utf-8",

        // JavaScript/WASM
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",

        _ => return None,
    };
    Some(content_type)
}

/// Content-Type for a file: extension first, then a text/binary sniff
pub fn content_type_for(path: &Path, content: &[u8]) -> &'static str {
    get_content_type(path.extension().and_then(|e| e.to_str()))
        .unwrap_or_else(|| sniff(content))
}

fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len() && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn sniff(content: &[u8]) -> &'static str {
    let head = &content[..content.len().min(SNIFF_LEN)];
    let trimmed = head.trim_ascii_start();
    if starts_with_ignore_case(trimmed, b"<html") || starts_with_ignore_case(trimmed, b"<!doctype") {
        return "text/html; charset=utf-8";
    }
    if head.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if head.starts_with(b"\x89PNG\r\n\x1a\n") {
        return "image/png";
    }
    // A multi-byte character may be cut at the sniff boundary
    let is_text = match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    };
    if is_text && !head.contains(&0) {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type(Some("html")), Some("text/html; charset=utf-8"));
        assert_eq!(get_content_type(Some("css")), Some("text/css; charset=utf-8"));
        assert_eq!(
            get_content_type(Some("js")),
            Some("text/javascript; charset=utf-8")
        );
        assert_eq!(get_content_type(Some("json")), Some("application/json"));
        assert_eq!(get_content_type(Some("PNG")), Some("image/png"));
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("xyz")), None);
        assert_eq!(get_content_type(None), None);
    }

    #[test]
    fn test_sniff_fallback() {
        let path = Path::new("README");
        assert_eq!(content_type_for(path, b"plain words"), "text/plain; charset=utf-8");
        assert_eq!(
            content_type_for(path, b"  <!DOCTYPE html><p>hi"),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            content_type_for(path, b"\x00\x01\x02binary"),
            "application/octet-stream"
        );
        assert_eq!(content_type_for(Path::new("a.css"), b"\x00"), "text/css; charset=utf-8");
    }
}
