// src/inventory/source.rs

//! Inventory sources
//!
//! The agent asks a source for one snapshot per cycle. Sources are
//! expected to be fast and side-effect free.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::InstanceInventory;
use crate::error::{Error, Result};

/// Producer of instance inventory snapshots
pub trait InventorySource {
    /// Take a snapshot of the current instance inventory
    fn snapshot(&self) -> Result<InstanceInventory>;
}

/// Reads a snapshot written as JSON by an external collector
#[derive(Debug, Clone)]
pub struct FileInventorySource {
    path: PathBuf,
}

impl FileInventorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InventorySource for FileInventorySource {
    fn snapshot(&self) -> Result<InstanceInventory> {
        debug!("Reading inventory snapshot from {}", self.path.display());

        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::SourceError(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            Error::SourceError(format!(
                "Malformed inventory snapshot {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Hands out clones of a snapshot already held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticInventorySource {
    inventory: InstanceInventory,
}

impl StaticInventorySource {
    pub fn new(inventory: InstanceInventory) -> Self {
        Self { inventory }
    }
}

impl InventorySource for StaticInventorySource {
    fn snapshot(&self) -> Result<InstanceInventory> {
        Ok(self.inventory.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_source_reads_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"Hostname": "db-1", "ShortName": "rhel"}"#).unwrap();

        let source = FileInventorySource::new(file.path());
        let inv = source.snapshot().unwrap();
        assert_eq!(inv.hostname, "db-1");
        assert_eq!(inv.short_name, "rhel");
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileInventorySource::new("/nonexistent/inventory.json");
        assert!(matches!(source.snapshot(), Err(Error::SourceError(_))));
    }

    #[test]
    fn test_file_source_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();

        let source = FileInventorySource::new(file.path());
        let err = source.snapshot().unwrap_err();
        assert!(err.to_string().contains("Malformed inventory snapshot"));
    }
}
