use clap::Parser;
use std::sync::Arc;

use nocache_httpd::config::{CliArgs, ServerConfig};
use nocache_httpd::logger::{self, LogSink, LogWriter};
use nocache_httpd::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    // Resolve the document root against the working directory at startup
    let config = ServerConfig::from_args(args)?;

    let writer = Arc::new(LogWriter::stderr());
    logger::writer::init(Arc::clone(&writer))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config, writer))
}

async fn async_main(
    config: ServerConfig,
    writer: Arc<LogWriter>,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = server::bind(&config, writer.as_ref()).await?;

    let log: Arc<dyn LogSink> = writer;
    let app = Arc::new(server::build_app(&config, log));
    server::serve(listener, app).await;
    Ok(())
}
