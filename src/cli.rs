//! Command line interface

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::CliOverrides;

/// HTTP service converting HTML to PDF
#[derive(Debug, Parser)]
#[command(name = "html2pdf-service", version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on [default: 8080]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to [default: 0.0.0.0]
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Number of runtime worker threads [default: CPU count]
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Maximum request body size in MB [default: 50]
    #[arg(long, value_name = "MB")]
    pub upload_limit: Option<usize>,

    /// Do not send CORS headers
    #[arg(long)]
    pub no_cors: bool,

    /// Config file (TOML)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Flags that override config file values
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            port: self.port,
            bind: self.bind.clone(),
            workers: self.workers,
            upload_limit_mb: self.upload_limit,
            cors: self.no_cors.then_some(false),
        }
    }

    /// Default tracing filter for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "html2pdf_service=info,tower_http=info",
            1 => "html2pdf_service=debug,tower_http=debug",
            _ => "html2pdf_service=trace,tower_http=trace",
        }
    }
}
