//! # Configuration
//!
//! Command-line flags, each with an environment variable fallback. A `.env`
//! file in the working directory is loaded before parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::error::{RelayError, RelayResult};
use crate::printer::PrinterRegistry;
use crate::server::ServerConfig;
use crate::server::state::DEFAULT_PRINTER;

/// ESC/POS relay - HTTP bridge to network thermal printers
#[derive(Parser, Debug)]
#[command(name = "escpos-relay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        #[command(flatten)]
        registry: RegistryArgs,

        #[command(flatten)]
        server: ServeArgs,
    },

    /// List registered printers
    Printers {
        #[command(flatten)]
        registry: RegistryArgs,

        /// Try to connect to each printer
        #[arg(long)]
        check: bool,

        /// Connect timeout in milliseconds
        #[arg(long, env = "PRINTER_TIMEOUT_MS", default_value_t = 5000)]
        timeout_ms: u64,
    },
}

#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "LOG_JSON")]
    pub log_json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RegistryArgs {
    /// JSON file describing the printers
    #[arg(long, env = "PRINTERS_FILE", value_name = "FILE")]
    pub printers_file: Option<PathBuf>,

    /// Inline printer as name=host[:port] (repeatable, or comma-separated in PRINTERS)
    #[arg(long = "printer", env = "PRINTERS", value_name = "SPEC", value_delimiter = ',')]
    pub printers: Vec<String>,
}

impl RegistryArgs {
    pub fn load(&self) -> RelayResult<PrinterRegistry> {
        PrinterRegistry::from_sources(self.printers_file.as_deref(), &self.printers)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "SERVER_PORT", default_value_t = 3006)]
    pub port: u16,

    /// Printer used when a request does not name one
    #[arg(long, env = "DEFAULT_PRINTER", default_value = DEFAULT_PRINTER)]
    pub default_printer: String,

    /// Connect and write timeout in milliseconds
    #[arg(long, env = "PRINTER_TIMEOUT_MS", default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Directory for staging uploads
    #[arg(long, env = "UPLOAD_FOLDER", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Largest accepted upload in megabytes
    #[arg(long, env = "MAX_UPLOAD_SIZE_MB", default_value_t = 20)]
    pub max_upload_mb: usize,

    /// Default image width in dots (510 for 80mm, 360 for 58mm)
    #[arg(long, env = "PAPER_WIDTH", default_value_t = 510)]
    pub paper_width: u32,

    /// Print a start-up notice on every printer
    #[arg(long, env = "ANNOUNCE_ON_START")]
    pub announce: bool,
}

impl ServeArgs {
    pub fn server_config(&self) -> RelayResult<ServerConfig> {
        if self.timeout_ms == 0 {
            return Err(RelayError::Config("timeout-ms must be greater than 0".to_string()));
        }
        if self.max_upload_mb == 0 {
            return Err(RelayError::Config("max-upload-mb must be greater than 0".to_string()));
        }
        if self.paper_width == 0 || self.paper_width > crate::render::image::MAX_PAPER_WIDTH {
            return Err(RelayError::Config(format!(
                "paper-width must be between 1 and {}",
                crate::render::image::MAX_PAPER_WIDTH
            )));
        }
        Ok(ServerConfig {
            host: self.host.clone(),
            port: self.port,
            default_printer: self.default_printer.clone(),
            paper_width: self.paper_width,
            upload_dir: self.upload_dir.clone(),
            max_upload_bytes: self.max_upload_mb * 1024 * 1024,
            announce: self.announce,
        })
    }
}
