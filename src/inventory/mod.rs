// src/inventory/mod.rs

//! Instance inventory snapshots
//!
//! An `InstanceInventory` is produced once per reporting cycle by an
//! `InventorySource` and is read-only from then on. Collection itself
//! (querying dpkg, rpm, WUA and friends) lives outside this crate.

mod source;

pub use source::{FileInventorySource, InventorySource, StaticInventorySource};

use serde::{Deserialize, Serialize};

use crate::packages::Packages;

/// Raw inventory of one instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InstanceInventory {
    pub hostname: String,
    pub long_name: String,
    /// Distribution short name (e.g. "debian", "rhel", "sles", "windows")
    pub short_name: String,
    pub version: String,
    pub architecture: String,
    pub kernel_version: String,
    pub kernel_release: String,
    #[serde(rename = "OSConfigAgentVersion")]
    pub agent_version: String,
    pub installed_packages: Packages,
    pub package_updates: Packages,
    pub last_updated: String,
}
