//! # Start-up Notice
//!
//! Prints a short "PRINTER ONLINE" slip on every registered printer when
//! the server comes up, so staff can tell which printers are reachable after
//! a power cut. Failures are logged and never stop the server.

use chrono::{DateTime, Local};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use crate::job::{Finish, Job};
use crate::printer::PrinterConfig;
use crate::protocol::commands::LF;
use crate::protocol::text::{self, Alignment, CharSize};
use crate::protocol::cp437;
use crate::server::AppState;

/// Any public address works; connecting a UDP socket sends no packets.
const DEFAULT_ROUTE_TARGET: &str = "8.8.8.8:80";

/// Where staff can reach this server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub hostname: String,
    /// LAN address, when one could be found
    pub local_ip: Option<IpAddr>,
    pub port: u16,
}

impl ServerIdentity {
    /// Work out the hostname and LAN address.
    ///
    /// A server bound to a concrete address reports that address; a wildcard
    /// bind reports the address of the interface the default route uses.
    pub async fn detect(bind_host: &str, port: u16) -> Self {
        let hostname = match hostname::get() {
            Ok(name) if !name.is_empty() => name.to_string_lossy().into_owned(),
            Ok(_) => "unknown".to_string(),
            Err(e) => {
                debug!(error = %e, "Cannot read hostname");
                "unknown".to_string()
            }
        };

        let bound = bind_host
            .trim_matches(|c| c == '[' || c == ']')
            .parse::<IpAddr>()
            .ok()
            .filter(|ip| !ip.is_unspecified());
        let local_ip = match bound {
            Some(ip) => Some(ip),
            None => outward_ip().await,
        };

        Self {
            hostname,
            local_ip,
            port,
        }
    }

    /// `http://ip:port`, when the LAN address is known.
    pub fn url(&self) -> Option<String> {
        self.local_ip
            .map(|ip| format!("http://{}", SocketAddr::new(ip, self.port)))
    }
}

async fn outward_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").await.ok()?;
    if let Err(e) = socket.connect(DEFAULT_ROUTE_TARGET).await {
        debug!(error = %e, "No default route, LAN address unknown");
        return None;
    }
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified()).then_some(ip)
}

/// The slip printed by [`announce_all`].
#[derive(Debug, Clone)]
pub struct BootNotice {
    pub printer: PrinterConfig,
    pub server: ServerIdentity,
    pub timestamp: DateTime<Local>,
}

impl BootNotice {
    fn line(out: &mut Vec<u8>, s: &str) {
        out.extend(cp437::encode(s));
        out.push(LF);
    }
}

impl Job for BootNotice {
    fn kind(&self) -> &'static str {
        "boot_notice"
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend(text::align(Alignment::Center));
        out.extend(text::bold(true));
        out.extend(text::char_size(CharSize::DOUBLE));
        Self::line(out, "PRINTER ONLINE");
        out.extend(text::char_size(CharSize::NORMAL));
        out.extend(text::bold(false));
        out.push(LF);

        Self::line(out, &self.printer.name);
        Self::line(out, &self.printer.address());
        out.push(LF);
        match self.server.local_ip {
            Some(ip) => Self::line(out, &format!("Server IP: {}", ip)),
            None => Self::line(out, "Server IP: unknown"),
        }
        Self::line(out, &format!("Server Port: {}", self.server.port));
        Self::line(out, &format!("Hostname: {}", self.server.hostname));
        if let Some(url) = self.server.url() {
            Self::line(out, &format!("URL: {}", url));
        }
        out.push(LF);
        Self::line(out, &self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string());
        out.extend(text::align(Alignment::Left));

        Finish {
            lines_after: 3,
            cut: true,
        }
        .emit(out);
    }
}

/// Send a [`BootNotice`] to each registered printer, one after another.
pub async fn announce_all(state: Arc<AppState>) {
    let server = ServerIdentity::detect(&state.config.host, state.config.port).await;
    info!(
        hostname = %server.hostname,
        url = server.url().as_deref().unwrap_or("unknown"),
        "Announcing server"
    );
    let mut online = 0usize;

    for printer in state.registry.iter() {
        let notice = BootNotice {
            printer: printer.clone(),
            server: server.clone(),
            timestamp: Local::now(),
        };
        match state.transport.send(printer, &notice.build()).await {
            Ok(()) => {
                online += 1;
                info!(printer = %printer.name, "Start-up notice printed");
            }
            Err(e) => warn!(printer = %printer.name, error = %e, "Start-up notice failed"),
        }
    }

    info!(online, total = state.registry.len(), "Start-up notices sent");
}
