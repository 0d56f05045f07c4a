// Configuration module entry point
// Command line options and the immutable server configuration built from them

mod error;

pub use error::ConfigError;

use clap::Parser;
use std::env;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DOC_ROOT: &str = ".";

/// Command line options
#[derive(Debug, Parser)]
#[command(
    name = "nocache-httpd",
    version,
    about = "Simple http server to deliver static files."
)]
pub struct CliArgs {
    /// Specify listen address
    #[arg(short = 'a', long = "addr", value_name = "ADDRESS", default_value = DEFAULT_ADDR)]
    pub addr: String,
    /// Specify the document root
    #[arg(short = 'd', long = "doc-root", value_name = "PATH", default_value = DEFAULT_DOC_ROOT)]
    pub doc_root: PathBuf,
}

/// Server configuration, fixed for the life of the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address as given, `host:port`
    pub addr: String,
    /// Absolute document root
    pub doc_root: PathBuf,
}

impl ServerConfig {
    /// Build the configuration, resolving the document root against the
    /// current working directory right now
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let cwd = env::current_dir().map_err(ConfigError::CurrentDir)?;
        Ok(Self {
            addr: args.addr,
            doc_root: resolve_doc_root(&args.doc_root, &cwd),
        })
    }

    /// Resolve the listen address, allowing host names and a bare `:port`
    pub async fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = if self.addr.starts_with(':') {
            format!("0.0.0.0{}", self.addr)
        } else {
            self.addr.clone()
        };
        let mut resolved = tokio::net::lookup_host(addr.as_str())
            .await
            .map_err(|source| ConfigError::Address {
                addr: self.addr.clone(),
                source,
            })?;
        resolved
            .next()
            .ok_or_else(|| ConfigError::NoAddress(self.addr.clone()))
    }
}

/// Make `path` absolute against `cwd` and normalize it lexically
pub fn resolve_doc_root(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` stays `/`
                let at_root = matches!(
                    out.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_)) | None
                );
                if !at_root {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["nocache-httpd"]).unwrap();
        assert_eq!(args.addr, "127.0.0.1:8080");
        assert_eq!(args.doc_root, PathBuf::from("."));
    }

    #[test]
    fn test_short_and_long_flags() {
        let args = CliArgs::try_parse_from(["nocache-httpd", "-a", "0.0.0.0:9000", "-d", "public"])
            .unwrap();
        assert_eq!(args.addr, "0.0.0.0:9000");
        assert_eq!(args.doc_root, PathBuf::from("public"));

        let args = CliArgs::try_parse_from([
            "nocache-httpd",
            "--addr",
            "[::1]:8443",
            "--doc-root",
            "/srv/www",
        ])
        .unwrap();
        assert_eq!(args.addr, "[::1]:8443");
        assert_eq!(args.doc_root, PathBuf::from("/srv/www"));
    }

    #[test]
    fn test_help_is_reported() {
        let err = CliArgs::try_parse_from(["nocache-httpd", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_doc_root() {
        let cwd = Path::new("/srv/www");
        assert_eq!(resolve_doc_root(Path::new("."), cwd), PathBuf::from("/srv/www"));
        assert_eq!(
            resolve_doc_root(Path::new("public/../site/"), cwd),
            PathBuf::from("/srv/www/site")
        );
        assert_eq!(resolve_doc_root(Path::new("/data"), cwd), PathBuf::from("/data"));
        assert_eq!(resolve_doc_root(Path::new("../../../.."), cwd), PathBuf::from("/"));
    }

    #[test]
    fn test_from_args_is_absolute() {
        let config = ServerConfig::from_args(CliArgs {
            addr: DEFAULT_ADDR.to_string(),
            doc_root: PathBuf::from("."),
        })
        .unwrap();
        assert!(config.doc_root.is_absolute());
        assert_eq!(config.doc_root, resolve_doc_root(Path::new("."), &env::current_dir().unwrap()));
    }

    #[tokio::test]
    async fn test_socket_addr() {
        let config = ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            doc_root: PathBuf::from("/"),
        };
        assert_eq!(config.socket_addr().await.unwrap(), "127.0.0.1:0".parse().unwrap());

        let bare_port = ServerConfig {
            addr: ":8080".to_string(),
            ..config.clone()
        };
        assert_eq!(bare_port.socket_addr().await.unwrap(), "0.0.0.0:8080".parse().unwrap());

        let invalid = ServerConfig {
            addr: "no-port-here".to_string(),
            ..config
        };
        assert!(matches!(
            invalid.socket_addr().await,
            Err(ConfigError::Address { .. })
        ));
    }
}
