//! HTTP server for the mdv markdown viewer.
//!
//! Serves rendered markdown pages straight from a source directory:
//! - `GET /` - index page listing every document under the root
//! - `GET /{*path}` - resolve the reference, read the file, convert to
//!   XHTML, wrap in the page layout
//!
//! Resolution and conversion happen per request; there is no render cache,
//! so edits on disk show up on the next reload.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mdv_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 8888,
//!         source_dir: PathBuf::from("docs"),
//!         verbose: false,
//!         version: "1.0.0".to_string(),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod layout;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use mdv_renderer::Converter;
use mdv_storage::DocStore;

use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory containing markdown files. The caller validates that it
    /// exists before starting the server.
    pub source_dir: PathBuf,
    /// Enable verbose output (log render warnings).
    pub verbose: bool,
    /// Application version (shown in the page footer).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8888,
            source_dir: PathBuf::from("."),
            verbose: false,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the address cannot be parsed or the listener fails
/// to bind.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        store: DocStore::new(config.source_dir.clone()),
        converter: Converter::new(),
        verbose: config.verbose,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, source_dir = %config.source_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
