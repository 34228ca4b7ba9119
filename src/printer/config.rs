//! # Printer Configuration
//!
//! A registered network printer: a unique name and the TCP endpoint of its
//! raw print port.
//!
//! ## Usage
//!
//! ```
//! use escpos_relay::printer::PrinterConfig;
//!
//! let config = PrinterConfig::parse_spec("kitchen=192.168.1.50").unwrap();
//! assert_eq!(config.name, "kitchen");
//! assert_eq!(config.port, 9100);
//! assert_eq!(config.address(), "192.168.1.50:9100");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, RelayResult};

/// Raw TCP print port used by nearly every network thermal printer
pub const DEFAULT_PORT: u16 = 9100;

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// # Printer Configuration
///
/// Created once at start-up and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// Name used by clients in the `printer` parameter
    pub name: String,

    /// Hostname or IP address
    pub host: String,

    /// Raw print port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl PrinterConfig {
    /// Build and validate a printer entry.
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> RelayResult<Self> {
        let config = Self {
            name: name.into().trim().to_string(),
            host: host.into().trim().to_string(),
            port,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that name and host are non-empty and the port is usable.
    pub fn validate(&self) -> RelayResult<()> {
        if self.name.is_empty() {
            return Err(RelayError::Config("printer name must not be empty".to_string()));
        }
        if self.name.chars().any(|c| c.is_whitespace() || c == ',' || c == '=') {
            return Err(RelayError::Config(format!(
                "printer name '{}' contains whitespace, ',' or '='",
                self.name
            )));
        }
        if self.host.is_empty() {
            return Err(RelayError::Config(format!("printer '{}' has no host", self.name)));
        }
        if self.port == 0 {
            return Err(RelayError::Config(format!("printer '{}' has port 0", self.name)));
        }
        Ok(())
    }

    /// Parse `name=host` or `name=host:port`.
    ///
    /// Bracketed IPv6 hosts are accepted: `lab=[fe80::1]:9100`.
    pub fn parse_spec(spec: &str) -> RelayResult<Self> {
        let (name, addr) = spec
            .split_once('=')
            .ok_or_else(|| RelayError::Config(format!("invalid printer spec '{}': expected name=host[:port]", spec)))?;
        let addr = addr.trim();

        let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| RelayError::Config(format!("invalid printer spec '{}': unclosed '['", spec)))?;
            match tail.strip_prefix(':') {
                Some(port) => (host, parse_port(spec, port)?),
                None if tail.is_empty() => (host, DEFAULT_PORT),
                None => return Err(RelayError::Config(format!("invalid printer spec '{}'", spec))),
            }
        } else {
            match addr.rsplit_once(':') {
                Some((host, _)) if host.contains(':') => {
                    return Err(RelayError::Config(format!(
                        "invalid printer spec '{}': IPv6 hosts must be bracketed, e.g. name=[{}]:9100",
                        spec, addr
                    )));
                }
                Some((host, port)) => (host, parse_port(spec, port)?),
                None => (addr, DEFAULT_PORT),
            }
        };

        Self::new(name, host, port)
    }

    /// `host:port`, suitable for `TcpStream::connect`.
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

fn parse_port(spec: &str, port: &str) -> RelayResult<u16> {
    port.trim()
        .parse::<u16>()
        .map_err(|_| RelayError::Config(format!("invalid port in printer spec '{}'", spec)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spec_with_port() {
        let config = PrinterConfig::parse_spec("bar=10.0.0.7:9101").unwrap();
        assert_eq!(config, PrinterConfig::new("bar", "10.0.0.7", 9101).unwrap());
    }

    #[test]
    fn test_parse_spec_default_port() {
        let config = PrinterConfig::parse_spec(" front = printer.local ").unwrap();
        assert_eq!(config.name, "front");
        assert_eq!(config.host, "printer.local");
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_parse_spec_ipv6() {
        let config = PrinterConfig::parse_spec("lab=[fe80::1]:9200").unwrap();
        assert_eq!(config.host, "fe80::1");
        assert_eq!(config.address(), "[fe80::1]:9200");
    }

    #[test]
    fn test_parse_spec_rejects_malformed() {
        for spec in [
            "nohost",
            "=1.2.3.4",
            "a=",
            "a=1.2.3.4:0",
            "a=1.2.3.4:http",
            "a b=1.2.3.4",
            "lab=fe80::1",
            "lab=fe80::1:9100",
        ] {
            assert!(
                matches!(PrinterConfig::parse_spec(spec), Err(RelayError::Config(_))),
                "'{}' should be rejected",
                spec
            );
        }
    }

    #[test]
    fn test_json_port_defaults() {
        let config: PrinterConfig = serde_json::from_str(r#"{"name":"a","host":"h"}"#).unwrap();
        assert_eq!(config.port, 9100);
    }
}
