//! # escpos-relay - HTTP Bridge for Network Thermal Printers
//!
//! Turns web requests into ESC/POS byte streams and sends them over TCP to
//! registered receipt printers. It provides:
//!
//! - **Protocol implementation**: ESC/POS command encoders
//! - **Rendering**: Image fitting, dithering and software QR codes
//! - **Jobs**: One validated builder per kind of request
//! - **Transport**: Raw TCP (port 9100) with timeouts
//! - **Server**: axum HTTP API
//!
//! ## Quick Start
//!
//! ```no_run
//! use escpos_relay::{
//!     job::{Job, TextJob},
//!     printer::PrinterConfig,
//!     transport::{NetworkTransport, Transport},
//! };
//!
//! # async fn example() -> Result<(), escpos_relay::RelayError> {
//! let printer = PrinterConfig::parse_spec("kitchen=192.168.1.50:9100")?;
//! let job = TextJob::new("Order #42 ready")?;
//!
//! NetworkTransport::default().send(&printer, &job.build()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | ESC/POS command encoders |
//! | [`render`] | Image preparation and dithering |
//! | [`job`] | Request-level command builders |
//! | [`transport`] | Communication backends |
//! | [`printer`] | Printer registry |
//! | [`server`] | HTTP API |
//! | [`config`] | CLI and environment configuration |
//! | [`error`] | Error types |

pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod notify;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use error::{RelayError, RelayResult};
pub use printer::{PrinterConfig, PrinterRegistry};
pub use transport::{NetworkTransport, Transport};
