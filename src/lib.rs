//! Static file HTTP server that forbids caching and logs every request.
//!
//! Requests flow through [`middleware::Logging`], then [`middleware::NoCache`],
//! then [`handler::FileServer`], all speaking the [`handler::Handler`] interface.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod middleware;
pub mod server;
