//! # TCP Transport
//!
//! Sends ESC/POS bytes to a printer's raw port (usually 9100).
//!
//! ## Connection Lifecycle
//!
//! Every [`send`](Transport::send) opens a fresh connection:
//!
//! ```text
//! connect (timeout) → write_all (timeout) → flush → shutdown → drop
//! ```
//!
//! There is no pooling and no retry. A successful return means the socket
//! accepted the bytes, not that paper came out.
//!
//! ## Serialization
//!
//! Sends to the same printer wait on a per-printer async mutex so two jobs
//! never interleave on the wire. Different printers do not block each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::Transport;
use crate::error::{RelayError, RelayResult};
use crate::printer::PrinterConfig;

/// Default connect/write timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Reachability checks use a shorter connect timeout
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct NetworkTransport {
    timeout: Duration,
    probe_timeout: Duration,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Default for NetworkTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl NetworkTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            probe_timeout: PROBE_TIMEOUT.min(timeout),
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn printer_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(name.to_string()).or_default().clone()
    }

    async fn connect(&self, printer: &PrinterConfig) -> RelayResult<TcpStream> {
        let addr = printer.address();
        tokio::time::timeout(self.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| {
                RelayError::Timeout(format!(
                    "connecting to {} ({}) took longer than {} ms",
                    printer.name,
                    addr,
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|e| RelayError::Connection(format!("{} ({}): {}", printer.name, addr, e)))
    }
}

#[async_trait]
impl Transport for NetworkTransport {
    #[instrument(skip(self, data), fields(printer = %printer.name, addr = %printer.address(), data_len = data.len()))]
    async fn send(&self, printer: &PrinterConfig, data: &[u8]) -> RelayResult<()> {
        let lock = self.printer_lock(&printer.name).await;
        let _guard = lock.lock().await;

        let mut stream = self.connect(printer).await?;
        debug!("Connected");

        let write = async {
            stream.write_all(data).await?;
            stream.flush().await?;
            stream.shutdown().await
        };
        tokio::time::timeout(self.timeout, write)
            .await
            .map_err(|_| {
                RelayError::Timeout(format!(
                    "writing {} bytes to {} took longer than {} ms",
                    data.len(),
                    printer.name,
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|e| RelayError::Connection(format!("write to {} failed: {}", printer.name, e)))?;

        info!("Job sent");
        Ok(())
    }

    #[instrument(skip(self), fields(printer = %printer.name, addr = %printer.address()))]
    async fn probe(&self, printer: &PrinterConfig) -> bool {
        match tokio::time::timeout(self.probe_timeout, TcpStream::connect(printer.address())).await {
            Ok(Ok(_)) => {
                debug!("Printer online");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    async fn listener() -> (TcpListener, PrinterConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let printer = PrinterConfig::new("test", "127.0.0.1", port).unwrap();
        (listener, printer)
    }

    #[tokio::test]
    async fn test_send_delivers_exact_bytes() {
        let (listener, printer) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let transport = NetworkTransport::default();
        transport.send(&printer, &[0x1B, 0x40, 0x70]).await.unwrap();

        assert_eq!(server.await.unwrap(), vec![0x1B, 0x40, 0x70]);
    }

    #[tokio::test]
    async fn test_each_send_opens_a_new_connection() {
        let (listener, printer) = listener().await;
        let server = tokio::spawn(async move {
            let mut jobs = Vec::new();
            for _ in 0..2 {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut received = Vec::new();
                socket.read_to_end(&mut received).await.unwrap();
                jobs.push(received);
            }
            jobs
        });

        let transport = NetworkTransport::default();
        transport.send(&printer, b"one").await.unwrap();
        transport.send(&printer, b"two").await.unwrap();

        assert_eq!(server.await.unwrap(), vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let (listener, printer) = listener().await;
        drop(listener);

        let transport = NetworkTransport::new(Duration::from_millis(500));
        let err = transport.send(&printer, b"x").await.unwrap_err();
        assert!(matches!(err, RelayError::Connection(_) | RelayError::Timeout(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_probe() {
        let (listener, printer) = listener().await;
        let transport = NetworkTransport::default();
        assert!(transport.probe(&printer).await);

        drop(listener);
        assert!(!transport.probe(&printer).await);
    }

    #[tokio::test]
    async fn test_same_printer_shares_lock() {
        let transport = NetworkTransport::default();
        let a = transport.printer_lock("a").await;
        let a_again = transport.printer_lock("a").await;
        let b = transport.printer_lock("b").await;
        assert!(Arc::ptr_eq(&a, &a_again));
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
