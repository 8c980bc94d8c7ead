//! Inventory documents produced by the host collection agent.
//!
//! The document is a map of probe name to `{ "data": { ... } }` plus two
//! top-level members, `collection_metadata` and `detected_architecture`.
//! Probe payloads are kept as raw JSON: individual fields are extracted and
//! parsed by the analyzer, which records a diagnostic instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Probe names emitted by the collection agent.
pub mod probes {
    pub const HARDWARE: &str = "get_hardware_info";
    pub const NETWORK: &str = "get_ip_info";
    pub const OS: &str = "get_os_info";
    pub const PACKAGES: &str = "get_packages_and_executables";
    pub const VIRTUALIZATION: &str = "get_virtualization_info";
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default = "empty_object")]
    pub collection_metadata: Value,
    #[serde(default)]
    pub detected_architecture: Value,
    #[serde(flatten)]
    pub probes: Map<String, Value>,
}

static MISSING: Value = Value::Null;

impl Inventory {
    pub fn from_file(path: &Path) -> Result<Self, InventoryError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                InventoryError::NotFound { path: path.to_path_buf() }
            } else {
                InventoryError::Read { path: path.to_path_buf(), source }
            }
        })?;

        serde_json::from_str(&content).map_err(|source| InventoryError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// The `data` payload of a probe, or `Null` when the probe or its payload is absent.
    ///
    /// Indexing into `Null` with [`Value::get`] yields `None`, so callers can
    /// treat a missing probe exactly like an empty one.
    pub fn probe_data(&self, probe: &str) -> &Value {
        self.probes
            .get(probe)
            .and_then(|envelope| envelope.get("data"))
            .unwrap_or(&MISSING)
    }

    pub fn architecture(&self) -> Option<String> {
        scalar_string(&self.detected_architecture)
    }

    /// `collection_metadata.timestamp` rendered as text.
    pub fn timestamp(&self) -> Option<String> {
        self.collection_metadata.get("timestamp").and_then(scalar_string)
    }
}

/// Render a JSON scalar as text. Strings pass through, numbers and booleans
/// are formatted, anything else is treated as absent.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_probe_data_lookup() {
        let inventory = Inventory::from_value(json!({
            "get_hardware_info": { "data": { "cpu_cores": 8 } },
            "get_ip_info": { "status": "failed" },
            "detected_architecture": "x86_64"
        }))
        .unwrap();

        assert_eq!(inventory.probe_data(probes::HARDWARE)["cpu_cores"], 8);
        assert!(inventory.probe_data(probes::NETWORK).is_null());
        assert!(inventory.probe_data(probes::OS).get("os_name").is_none());
        assert_eq!(inventory.architecture().as_deref(), Some("x86_64"));
    }

    #[test]
    fn test_missing_metadata_defaults_to_empty_object() {
        let inventory = Inventory::from_value(json!({})).unwrap();
        assert_eq!(inventory.collection_metadata, json!({}));
        assert_eq!(inventory.architecture(), None);
        assert_eq!(inventory.timestamp(), None);
    }

    #[test]
    fn test_from_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = Inventory::from_file(&path).unwrap_err();
        assert!(matches!(err, InventoryError::NotFound { .. }));
        assert!(err.to_string().starts_with("File not found:"));
    }

    #[test]
    fn test_from_file_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"get_hardware_info\": ").unwrap();

        let err = Inventory::from_file(&path).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidJson { .. }));
        assert!(err.to_string().contains("Invalid JSON in"));
    }

    #[test]
    fn test_from_file_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        std::fs::write(
            &path,
            r#"{"collection_metadata": {"timestamp": "2024-05-01T12:00:00Z"}}"#,
        )
        .unwrap();

        let inventory = Inventory::from_file(&path).unwrap();
        assert_eq!(inventory.timestamp().as_deref(), Some("2024-05-01T12:00:00Z"));
    }
}
