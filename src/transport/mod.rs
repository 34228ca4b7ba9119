//! # Printer Transport Layer
//!
//! Delivers finished command buffers to printers.
//!
//! ## Available Transports
//!
//! - [`network`]: Raw TCP (port 9100)
//!
//! The HTTP layer only sees the [`Transport`] trait, so tests can swap in a
//! recording implementation.

pub mod network;

use async_trait::async_trait;

use crate::error::RelayResult;
use crate::printer::PrinterConfig;

pub use network::NetworkTransport;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `data` to `printer` in one connection.
    async fn send(&self, printer: &PrinterConfig, data: &[u8]) -> RelayResult<()>;

    /// Whether the printer accepts connections right now.
    async fn probe(&self, printer: &PrinterConfig) -> bool;
}
