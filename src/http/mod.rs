//! HTTP protocol layer module
//!
//! Base HTTP functionality shared by the file server and the middlewares:
//! the response sink, validators, MIME types, ranges and canned responses.

pub mod cache;
pub mod mime;
pub mod path;
pub mod range;
pub mod response;
pub mod sink;

// Re-export commonly used types
pub use range::parse_range_header;
pub use sink::{ResponseBuffer, ResponseSink};
