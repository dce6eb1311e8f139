//! `mdv serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdv_config::{CliSettings, Config};
use mdv_server::{ServerConfig, run_server};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mdv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing markdown files (overrides config).
    #[arg(short = 'd', long, alias = "dir")]
    source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (show render warnings).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the source directory is
    /// missing, or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // The server assumes the root exists; validate it up front.
        if !config.source_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "directory {} does not exist",
                config.source_dir.display()
            )));
        }

        output.info(&format!(
            "Server starting on http://{}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Serving markdown files from: {}",
            config.source_dir.display()
        ));

        let server_config = ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
            source_dir: config.source_dir.clone(),
            verbose: self.verbose,
            version: version.to_owned(),
        };
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
