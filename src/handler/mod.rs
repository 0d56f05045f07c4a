//! Request handler module
//!
//! [`Handler`] is the single request-handling interface shared by the file
//! server and every middleware wrapped around it.

pub mod static_files;

pub use static_files::FileServer;

use hyper::Request;
use std::future::Future;
use std::io;
use std::net::SocketAddr;

use crate::http::ResponseSink;

/// Address of the peer that sent a request, stored in its extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAddr(pub SocketAddr);

/// Serves one request by writing into a response sink
///
/// The request body is not part of the contract; handlers see method, URI,
/// headers and extensions only. Middlewares may mutate the request before
/// passing it on. An `Err` means the response could not be completed, most
/// often because a write to the sink failed.
pub trait Handler: Send + Sync + 'static {
    fn serve(
        &self,
        req: &mut Request<()>,
        sink: &mut dyn ResponseSink,
    ) -> impl Future<Output = io::Result<()>> + Send;
}
