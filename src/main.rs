//! html2pdf-service - HTML to PDF over HTTP
//!
//! Server entry point

use anyhow::Context;
use clap::Parser;
use html2pdf_service::{Cli, Config, WebServer};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // An explicit config file must load; the default location is best effort
    let file_config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring config file: {}", e);
            Config::default()
        }),
    };
    let config = file_config.merge_with_cli(&cli.overrides());
    tracing::debug!(?config, "Resolved server configuration");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    rt.block_on(async {
        WebServer::with_config(config)
            .run()
            .await
            .map_err(|e| anyhow::anyhow!(e))
    })
}
