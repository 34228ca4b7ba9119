//! # Printer Registry
//!
//! The ordered, immutable set of printers this server may talk to. Built at
//! start-up from a JSON file and/or inline `name=host[:port]` specs; any
//! malformed entry or duplicate name is a configuration error.
//!
//! Two JSON layouts are accepted:
//!
//! ```json
//! {"printers": [{"name": "kitchen", "host": "10.0.0.5", "port": 9100}]}
//! ```
//!
//! ```json
//! {"kitchen": {"host": "10.0.0.5", "port": 9100}}
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::config::{PrinterConfig, DEFAULT_PORT};
use crate::error::{RelayError, RelayResult};

#[derive(Debug, Default, Clone)]
pub struct PrinterRegistry {
    printers: Vec<PrinterConfig>,
}

#[derive(Deserialize)]
struct ListFile {
    printers: Vec<PrinterConfig>,
}

#[derive(Deserialize)]
struct MapEntry {
    host: String,
    #[serde(default)]
    port: Option<u16>,
}

impl PrinterRegistry {
    /// Build a registry, rejecting invalid entries and duplicate names.
    pub fn new(printers: Vec<PrinterConfig>) -> RelayResult<Self> {
        let mut seen = HashSet::new();
        for printer in &printers {
            printer.validate()?;
            if !seen.insert(printer.name.as_str()) {
                return Err(RelayError::Config(format!("duplicate printer name '{}'", printer.name)));
            }
        }
        Ok(Self { printers })
    }

    /// Parse either JSON layout.
    pub fn parse_json(json: &str) -> RelayResult<Vec<PrinterConfig>> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| RelayError::Config(format!("invalid printers JSON: {}", e)))?;

        if value.get("printers").is_some_and(Value::is_array) {
            let file: ListFile = serde_json::from_value(value)
                .map_err(|e| RelayError::Config(format!("invalid printers list: {}", e)))?;
            return Ok(file.printers);
        }

        let Value::Object(map) = value else {
            return Err(RelayError::Config(
                "printers JSON must be an object".to_string(),
            ));
        };
        map.into_iter()
            .map(|(name, entry)| {
                let entry: MapEntry = serde_json::from_value(entry)
                    .map_err(|e| RelayError::Config(format!("invalid entry for printer '{}': {}", name, e)))?;
                PrinterConfig::new(name, entry.host, entry.port.unwrap_or(DEFAULT_PORT))
            })
            .collect()
    }

    /// Read and parse a printers file.
    pub fn load_file(path: &Path) -> RelayResult<Vec<PrinterConfig>> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| RelayError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse_json(&json)
    }

    /// Merge a file (if any) with inline specs, in that order.
    ///
    /// Inline specs may themselves be comma-separated lists, which is how the
    /// `PRINTERS` environment variable arrives.
    pub fn from_sources(file: Option<&Path>, specs: &[String]) -> RelayResult<Self> {
        let mut printers = match file {
            Some(path) => Self::load_file(path)?,
            None => Vec::new(),
        };
        for spec in specs.iter().flat_map(|s| s.split(',')) {
            let spec = spec.trim();
            if spec.is_empty() {
                continue;
            }
            printers.push(PrinterConfig::parse_spec(spec)?);
        }
        if printers.is_empty() {
            return Err(RelayError::Config(
                "no printers configured (use --printers-file or --printer)".to_string(),
            ));
        }
        Self::new(printers)
    }

    pub fn lookup(&self, name: &str) -> Option<&PrinterConfig> {
        self.printers.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.printers.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrinterConfig> {
        self.printers.iter()
    }

    pub fn len(&self) -> usize {
        self.printers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.printers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_form() {
        let printers = PrinterRegistry::parse_json(
            r#"{"printers":[{"name":"a","host":"10.0.0.1","port":9100},{"name":"b","host":"10.0.0.2"}]}"#,
        )
        .unwrap();
        assert_eq!(printers.len(), 2);
        assert_eq!(printers[1].port, 9100);
    }

    #[test]
    fn test_map_form() {
        let printers =
            PrinterRegistry::parse_json(r#"{"kitchen":{"host":"10.0.0.5","port":9101}}"#).unwrap();
        assert_eq!(printers, vec![PrinterConfig::new("kitchen", "10.0.0.5", 9101).unwrap()]);
    }

    #[test]
    fn test_malformed_json() {
        assert!(PrinterRegistry::parse_json("[1,2]").is_err());
        assert!(PrinterRegistry::parse_json("{").is_err());
        assert!(PrinterRegistry::parse_json(r#"{"a":{"port":9100}}"#).is_err());
        assert!(PrinterRegistry::parse_json(r#"{"printers":[{"name":"a","host":""}]}"#).is_ok());
        // Empty host only fails once the registry validates it
        let printers = PrinterRegistry::parse_json(r#"{"printers":[{"name":"a","host":""}]}"#).unwrap();
        assert!(PrinterRegistry::new(printers).is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let specs = vec!["a=10.0.0.1".to_string(), "a=10.0.0.2".to_string()];
        let err = PrinterRegistry::from_sources(None, &specs).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_comma_separated_specs() {
        let specs = vec!["printer_1=10.0.0.1, printer_2=10.0.0.2:9101,".to_string()];
        let registry = PrinterRegistry::from_sources(None, &specs).unwrap();
        assert_eq!(registry.names(), vec!["printer_1", "printer_2"]);
        assert_eq!(registry.lookup("printer_2").map(|p| p.port), Some(9101));
        assert!(registry.lookup("printer_3").is_none());
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert!(PrinterRegistry::from_sources(None, &[]).is_err());
    }

    #[test]
    fn test_file_then_specs() {
        let dir = std::env::temp_dir().join(format!("escpos-relay-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("printers.json");
        std::fs::write(&path, r#"{"printers":[{"name":"file","host":"10.0.0.9"}]}"#).unwrap();

        let registry = PrinterRegistry::from_sources(Some(&path), &["inline=10.0.0.10".to_string()]).unwrap();
        assert_eq!(registry.names(), vec!["file", "inline"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
