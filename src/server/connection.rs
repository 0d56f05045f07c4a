// Connection handling module
// Serves one TCP connection and turns handler output into hyper responses

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::handler::{ClientAddr, Handler};
use crate::http::ResponseBuffer;
use crate::logger;

/// Run one request through `handler` and build the response to send
///
/// The request body is dropped unread; the client address is attached as a
/// [`ClientAddr`] extension.
pub async fn dispatch<H: Handler, B>(
    handler: &H,
    req: Request<B>,
    peer_addr: SocketAddr,
) -> Response<Full<Bytes>> {
    let (parts, _) = req.into_parts();
    let mut req = Request::from_parts(parts, ());
    req.extensions_mut().insert(ClientAddr(peer_addr));

    let mut buffer = ResponseBuffer::new();
    match handler.serve(&mut req, &mut buffer).await {
        Ok(()) => buffer.into_response(),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to serve {} {} for {peer_addr}: {e}",
                req.method(),
                req.uri()
            ));
            buffer.into_failure_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Serve a connection on its own task until the client goes away
pub fn spawn_connection<H: Handler>(stream: TcpStream, peer_addr: SocketAddr, handler: Arc<H>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let service = service_fn(move |req| {
            let handler = Arc::clone(&handler);
            async move { Ok::<_, Infallible>(dispatch(&*handler, req, peer_addr).await) }
        });

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);
        if let Err(err) = builder.serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
