//! # Printer Module
//!
//! Registered network printers.
//!
//! ## Modules
//!
//! - [`config`]: One printer's name and TCP endpoint
//! - [`registry`]: The immutable name → printer table

pub mod config;
pub mod registry;

pub use config::PrinterConfig;
pub use registry::PrinterRegistry;
