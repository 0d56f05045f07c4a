//! Middleware module
//!
//! Handlers that wrap another [`Handler`](crate::handler::Handler):
//! - [`Logging`]: one access log line per request
//! - [`NoCache`]: defeats client and proxy caching

pub mod logging;
pub mod nocache;

pub use logging::{CaptureSink, Logging};
pub use nocache::NoCache;
