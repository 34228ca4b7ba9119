//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::info;

use super::error::ApiError;
use crate::job::Job;
use crate::printer::{PrinterConfig, PrinterRegistry};
use crate::transport::Transport;

/// Name used when a request does not say which printer to use.
pub const DEFAULT_PRINTER: &str = "printer_1";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0")
    pub host: String,
    pub port: u16,
    /// Printer used when the request has no `printer` parameter
    pub default_printer: String,
    /// Default image width in dots
    pub paper_width: u32,
    /// Where uploads are staged while being decoded
    pub upload_dir: PathBuf,
    /// Largest accepted upload
    pub max_upload_bytes: usize,
    /// Print a start-up notice on every printer
    pub announce: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3006,
            default_printer: DEFAULT_PRINTER.to_string(),
            paper_width: 510,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 20 * 1024 * 1024,
            announce: false,
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub registry: PrinterRegistry,
    pub transport: Arc<dyn Transport>,
}

impl AppState {
    pub fn new(config: ServerConfig, registry: PrinterRegistry, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            registry,
            transport,
        }
    }

    /// Look up the requested printer, falling back to the default.
    ///
    /// A non-empty `printer_name` wins over `printer`.
    pub fn resolve(
        &self,
        printer: Option<&str>,
        printer_name: Option<&str>,
    ) -> Result<&PrinterConfig, ApiError> {
        fn given(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }
        let name = given(printer_name)
            .or_else(|| given(printer))
            .unwrap_or(self.config.default_printer.as_str());
        self.registry
            .lookup(name)
            .ok_or_else(|| ApiError::NotFound(name.to_string()))
    }

    /// Build the job, send it and describe the result.
    ///
    /// `details` must be a JSON object; its keys are merged into the reply.
    pub async fn dispatch(
        &self,
        printer: &PrinterConfig,
        job: &(dyn Job + Sync),
        message: &str,
        details: Value,
    ) -> Result<Value, ApiError> {
        let data = job.build();
        self.transport.send(printer, &data).await?;
        info!(
            job = job.kind(),
            printer = %printer.name,
            addr = %printer.address(),
            bytes = data.len(),
            "Job dispatched"
        );
        Ok(job_response(printer, data.len(), message, details))
    }
}

/// `{ok, message, printer, host, port, bytes, ...details}`
pub fn job_response(printer: &PrinterConfig, bytes: usize, message: &str, details: Value) -> Value {
    let mut body = Map::new();
    body.insert("ok".into(), json!(true));
    body.insert("message".into(), json!(message));
    body.insert("printer".into(), json!(printer.name));
    body.insert("host".into(), json!(printer.host));
    body.insert("port".into(), json!(printer.port));
    body.insert("bytes".into(), json!(bytes));
    if let Value::Object(extra) = details {
        body.extend(extra);
    }
    Value::Object(body)
}
