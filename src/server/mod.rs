// Server module entry point
// Builds the handler chain and runs the accept loop

pub mod connection;
pub mod listener;

pub use connection::{dispatch, spawn_connection};
pub use listener::create_listener;

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ServerConfig};
use crate::handler::{FileServer, Handler};
use crate::logger::{self, LogSink};
use crate::middleware::{Logging, NoCache};

/// The full handler chain: logging, then no-cache, then the file server
pub type App = Logging<NoCache<FileServer>>;

/// Assemble the handler chain for a configuration
pub fn build_app(config: &ServerConfig, log: Arc<dyn LogSink>) -> App {
    Logging::new(NoCache::new(FileServer::new(config.doc_root.clone())), log)
}

/// Resolve and bind the configured address, then announce it
///
/// The startup line carries the address actually bound, so port 0 shows the
/// port the OS assigned.
pub async fn bind(config: &ServerConfig, log: &dyn LogSink) -> Result<TcpListener, ConfigError> {
    let addr = config.socket_addr().await?;
    let listener = create_listener(addr).map_err(|source| ConfigError::Bind { addr, source })?;
    let bound = listener
        .local_addr()
        .map_err(|source| ConfigError::Bind { addr, source })?;

    logger::log_listening(log, &bound);
    logger::log_document_root(log, &config.doc_root);
    Ok(listener)
}

/// Accept connections forever, serving each on its own task
///
/// Accept errors (e.g. running out of file descriptors) are logged and the
/// loop carries on.
pub async fn serve<H: Handler>(listener: TcpListener, handler: Arc<H>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                spawn_connection(stream, peer_addr, Arc::clone(&handler));
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryLog {
        lines: Mutex<Vec<String>>,
    }

    impl LogSink for MemoryLog {
        fn write_line(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }

    #[tokio::test]
    async fn test_bind_announces_assigned_port() {
        let config = ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            doc_root: PathBuf::from("/srv/www"),
        };
        let log = MemoryLog::default();
        let listener = bind(&config, &log).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        assert_ne!(port, 0);

        let lines = log.lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("Listening '127.0.0.1:{port}'..."));
        assert_eq!(lines[1], format!("document root '{}'", PathBuf::from("/srv/www").display()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_bind_reports_port_in_use() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let config = ServerConfig {
            addr: taken.local_addr().unwrap().to_string(),
            doc_root: PathBuf::from("/srv/www"),
        };
        let log = MemoryLog::default();

        let err = bind(&config, &log).await.unwrap_err();
        assert!(matches!(err, ConfigError::Bind { .. }), "{err}");
        assert!(log.lines.lock().unwrap().is_empty());
    }
}
