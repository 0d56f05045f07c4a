//! Request path utilities
//!
//! URL decoding of request paths into safe relative filesystem paths, and
//! the escaping needed to put file names back into HTML.

use std::error::Error;
use std::fmt;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// A `..` segment
    Traversal,
    /// NUL byte, or not UTF-8 after decoding
    InvalidCharacters,
    /// `%` not followed by two hex digits
    InvalidEncoding,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Traversal => f.write_str("path contains `..`"),
            Self::InvalidCharacters => f.write_str("path contains forbidden characters"),
            Self::InvalidEncoding => f.write_str("path contains an invalid percent escape"),
        }
    }
}

impl Error for PathError {}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decode `%XX` escapes
pub fn percent_decode(input: &str) -> Result<Vec<u8>, PathError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).copied().and_then(hex_value);
            let lo = bytes.get(i + 2).copied().and_then(hex_value);
            let (Some(hi), Some(lo)) = (hi, lo) else {
                return Err(PathError::InvalidEncoding);
            };
            out.push((hi << 4) | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Convert a URL path into a relative filesystem path
///
/// Empty and `.` segments are dropped; `/` yields `.`.
pub fn sanitize(url_path: &str) -> Result<PathBuf, PathError> {
    let decoded = percent_decode(url_path)?;
    if decoded.contains(&0) {
        return Err(PathError::InvalidCharacters);
    }
    let decoded = String::from_utf8(decoded).map_err(|_| PathError::InvalidCharacters)?;

    let mut out = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(PathError::Traversal),
            _ => out.push(segment),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    Ok(out)
}

/// Percent-encode a single path segment for use in an href
pub fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for &byte in segment.as_bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~!$&'()*+,=:@".contains(&byte) {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

/// Escape text for an HTML body or attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
