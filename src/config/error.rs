// Startup configuration errors

use std::error::Error;
use std::fmt;
use std::io;
use std::net::SocketAddr;

#[derive(Debug)]
pub enum ConfigError {
    /// The working directory needed to absolutize the document root is unavailable
    CurrentDir(io::Error),
    /// The listen address could not be parsed or resolved
    Address { addr: String, source: io::Error },
    /// The listen address resolved to nothing
    NoAddress(String),
    /// The resolved address could not be bound
    Bind { addr: SocketAddr, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentDir(e) => write!(f, "cannot determine working directory: {e}"),
            Self::Address { addr, source } => write!(f, "invalid listen address '{addr}': {source}"),
            Self::NoAddress(addr) => write!(f, "listen address '{addr}' resolved to nothing"),
            Self::Bind { addr, source } => write!(f, "cannot listen on {addr}: {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(e)
            | Self::Address { source: e, .. }
            | Self::Bind { source: e, .. } => Some(e),
            Self::NoAddress(_) => None,
        }
    }
}
