//! # escpos-relay CLI
//!
//! ## Usage
//!
//! ```bash
//! # Serve two printers
//! escpos-relay serve --printer printer_1=192.168.1.50 --printer bar=192.168.1.51:9100
//!
//! # Same thing from a file, announcing on start-up
//! escpos-relay serve --printers-file printers.json --announce
//!
//! # Which printers answer right now?
//! escpos-relay printers --printers-file printers.json --check
//! ```

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

use escpos_relay::{
    NetworkTransport, RelayError, Transport,
    config::{Cli, Commands},
    logging,
    server::{self, AppState},
};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), RelayError> {
    let cli = Cli::parse();
    logging::init(&cli.log.log_level, cli.log.log_json)?;

    match cli.command {
        Commands::Serve {
            registry,
            server: serve_args,
        } => {
            let registry = registry.load()?;
            let config = serve_args.server_config()?;
            let transport = NetworkTransport::new(Duration::from_millis(serve_args.timeout_ms));

            let state = AppState::new(config, registry, Arc::new(transport));
            server::serve(Arc::new(state)).await
        }

        Commands::Printers {
            registry,
            check,
            timeout_ms,
        } => {
            let registry = registry.load()?;
            let transport = NetworkTransport::new(Duration::from_millis(timeout_ms.max(1)));

            println!("{} printer(s):", registry.len());
            for printer in registry.iter() {
                let status = if check {
                    if transport.probe(printer).await {
                        "  online"
                    } else {
                        "  OFFLINE"
                    }
                } else {
                    ""
                };
                println!("  {:<16} {}{}", printer.name, printer.address(), status);
            }
            Ok(())
        }
    }
}
