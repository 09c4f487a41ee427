//! Firmscope search server
//!
//! Serves the firmware database search API.

use std::sync::Arc;

use clap::Parser;
use firmscope_persistence::backends::memory::{InMemoryBackend, InMemoryBinarySearch};
use firmscope_rest::{ServerConfig, create_app_with_config, init_logging};
use tracing::info;

/// Creates the in-memory backend, loading the configured data file if any.
fn create_backend(config: &ServerConfig) -> anyhow::Result<InMemoryBackend> {
    match &config.data_file {
        Some(path) => {
            info!(data_file = %path.display(), "Loading firmware records");
            let backend = InMemoryBackend::load_records(path)?;
            info!(records = backend.len(), "Firmware records loaded");
            Ok(backend)
        }
        None => {
            info!("No data file configured, starting with an empty database");
            Ok(InMemoryBackend::new())
        }
    }
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        hash_algorithms = %config.hash_algorithms,
        auth = config.enable_auth,
        "Starting Firmscope search server"
    );

    let backend = create_backend(&config)?;
    let app = create_app_with_config(
        backend,
        Arc::new(InMemoryBinarySearch::new()),
        config.clone(),
    );
    serve(app, &config).await
}
