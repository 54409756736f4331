// src/packages/canonical.rs

//! Canonical wire representation of software packages
//!
//! `SoftwarePackage` is a one-of over the seven wire families. It is
//! externally tagged when serialized, so an apt package encodes as
//! `{"aptPackage": {...}}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized package or patch entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoftwarePackage {
    AptPackage(VersionedPackage),
    GoogetPackage(VersionedPackage),
    YumPackage(VersionedPackage),
    ZypperPackage(VersionedPackage),
    ZypperPatch(ZypperPatchDetails),
    WuaPackage(WindowsUpdatePackage),
    QfePackage(WindowsQuickFixEngineeringPackage),
}

impl SoftwarePackage {
    /// Wire family name of this variant
    pub fn family(&self) -> &'static str {
        match self {
            Self::AptPackage(_) => "apt",
            Self::GoogetPackage(_) => "googet",
            Self::YumPackage(_) => "yum",
            Self::ZypperPackage(_) => "zypper",
            Self::ZypperPatch(_) => "zypper_patch",
            Self::WuaPackage(_) => "wua",
            Self::QfePackage(_) => "qfe",
        }
    }

    /// Versioned payload, for the four package-manager families
    pub fn versioned(&self) -> Option<&VersionedPackage> {
        match self {
            Self::AptPackage(p)
            | Self::GoogetPackage(p)
            | Self::YumPackage(p)
            | Self::ZypperPackage(p) => Some(p),
            Self::ZypperPatch(_) | Self::WuaPackage(_) | Self::QfePackage(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedPackage {
    pub package_name: String,
    pub architecture: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZypperPatchDetails {
    pub patch_name: String,
    pub category: String,
    pub severity: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowsUpdatePackage {
    pub title: String,
    pub description: String,
    pub categories: Vec<WindowsUpdateCategory>,
    pub kb_article_ids: Vec<String>,
    pub support_url: Vec<String>,
    pub update_id: String,
    pub revision_number: i32,
    pub last_deployment_change_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowsUpdateCategory {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowsQuickFixEngineeringPackage {
    pub caption: String,
    pub description: String,
    pub hot_fix_id: String,
    pub install_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_is_externally_tagged() {
        let pkg = SoftwarePackage::AptPackage(VersionedPackage {
            package_name: "bash".to_string(),
            architecture: "amd64".to_string(),
            version: "5.2-1".to_string(),
        });

        let json = serde_json::to_value(&pkg).unwrap();
        assert_eq!(json["aptPackage"]["packageName"], "bash");
        assert_eq!(json["aptPackage"]["architecture"], "amd64");
        assert_eq!(pkg.family(), "apt");
        assert_eq!(pkg.versioned().map(|p| p.version.as_str()), Some("5.2-1"));
    }

    #[test]
    fn test_patch_has_no_versioned_payload() {
        let patch = SoftwarePackage::ZypperPatch(ZypperPatchDetails::default());
        assert!(patch.versioned().is_none());
        let json = serde_json::to_value(&patch).unwrap();
        assert!(json.get("zypperPatch").is_some());
    }
}
