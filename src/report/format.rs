// src/report/format.rs

//! Assembly of the canonical inventory record

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::Result;
use crate::inventory::InstanceInventory;
use crate::packages::{normalize_packages, SoftwarePackage};

/// Operating system descriptor sent with every report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsInfo {
    pub hostname: String,
    pub long_name: String,
    pub short_name: String,
    pub version: String,
    pub architecture: String,
    pub kernel_version: String,
    pub kernel_release: String,
    pub osconfig_agent_version: String,
}

/// Canonical inventory for one reporting cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub os_info: OsInfo,
    pub installed_packages: Vec<SoftwarePackage>,
    pub available_packages: Vec<SoftwarePackage>,
}

impl Inventory {
    /// Hex SHA-256 of the serialized inventory
    ///
    /// Identical inventories always produce identical checksums, which
    /// lets the endpoint decide whether it needs the full body.
    pub fn checksum(&self) -> Result<String> {
        let encoded = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&encoded)))
    }
}

/// Build the canonical inventory from a raw snapshot
pub fn format_inventory(state: &InstanceInventory) -> Inventory {
    let os_info = OsInfo {
        hostname: state.hostname.clone(),
        long_name: state.long_name.clone(),
        short_name: state.short_name.clone(),
        version: state.version.clone(),
        architecture: state.architecture.clone(),
        kernel_version: state.kernel_version.clone(),
        kernel_release: state.kernel_release.clone(),
        osconfig_agent_version: state.agent_version.clone(),
    };

    let installed_packages = normalize_packages(&state.installed_packages, &state.short_name);
    let available_packages = normalize_packages(&state.package_updates, &state.short_name);

    debug!(
        "Formatted inventory for {} ({}): {} installed, {} available",
        os_info.hostname,
        os_info.short_name,
        installed_packages.len(),
        available_packages.len()
    );

    Inventory {
        os_info,
        installed_packages,
        available_packages,
    }
}
