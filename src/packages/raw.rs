// src/packages/raw.rs

//! Package records as produced by the inventory source
//!
//! Each package manager reports its own record shape. These types mirror
//! what the collector emits, field for field, and are never modified by
//! the normalizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A versioned package (apt, deb, googet, yum, rpm, zypper, pip, gem)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PkgInfo {
    pub name: String,
    pub arch: String,
    pub version: String,
}

impl PkgInfo {
    pub fn new(name: impl Into<String>, arch: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arch: arch.into(),
            version: version.into(),
        }
    }
}

/// A zypper patch (SUSE)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZypperPatch {
    pub name: String,
    pub category: String,
    pub severity: String,
    pub summary: String,
}

/// A Windows Update Agent entry
///
/// `categories` and `category_ids` are index-aligned: the n-th id belongs
/// to the n-th category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WuaPackage {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, rename = "CategoryIDs")]
    pub category_ids: Vec<String>,
    #[serde(default, rename = "KBArticleIDs")]
    pub kb_article_ids: Vec<String>,
    /// More-info URL reported by WUA; not carried on the wire yet
    #[serde(default, rename = "SupportURL")]
    pub support_url: String,
    #[serde(rename = "UpdateID")]
    pub update_id: String,
    pub revision_number: i32,
    pub last_deployment_change_time: DateTime<Utc>,
}

/// A Windows QFE hotfix entry
///
/// `installed_on` is the raw `M/D/YYYY` string reported by WMI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QfePackage {
    pub caption: String,
    pub description: String,
    #[serde(rename = "HotFixID")]
    pub hot_fix_id: String,
    pub installed_on: String,
}

/// All package lists reported for one snapshot, keyed by manager
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packages {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub yum: Vec<PkgInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rpm: Vec<PkgInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apt: Vec<PkgInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deb: Vec<PkgInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zypper: Vec<PkgInfo>,
    #[serde(default, rename = "zypperPatches", skip_serializing_if = "Vec::is_empty")]
    pub zypper_patches: Vec<ZypperPatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gem: Vec<PkgInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pip: Vec<PkgInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub googet: Vec<PkgInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wua: Vec<WuaPackage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qfe: Vec<QfePackage>,
}

impl Packages {
    /// Number of records held for one manager
    pub fn count(&self, manager: PackageManager) -> usize {
        match manager {
            PackageManager::Apt => self.apt.len(),
            PackageManager::GooGet => self.googet.len(),
            PackageManager::Yum => self.yum.len(),
            PackageManager::Zypper => self.zypper.len(),
            PackageManager::ZypperPatch => self.zypper_patches.len(),
            PackageManager::Wua => self.wua.len(),
            PackageManager::Qfe => self.qfe.len(),
            PackageManager::Deb => self.deb.len(),
            PackageManager::Rpm => self.rpm.len(),
            PackageManager::Pip => self.pip.len(),
            PackageManager::Gem => self.gem.len(),
        }
    }

    /// True when no manager has any record
    pub fn is_empty(&self) -> bool {
        PackageManager::ALL.iter().all(|m| self.count(*m) == 0)
    }
}

/// Package manager / update mechanism that produced a record list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Apt,
    GooGet,
    Yum,
    Zypper,
    ZypperPatch,
    /// Windows Update Agent
    Wua,
    /// Windows Quick Fix Engineering hotfixes
    Qfe,
    /// Raw dpkg database, cross-mapped to apt
    Deb,
    /// Raw rpm database, cross-mapped to yum or zypper
    Rpm,
    Pip,
    Gem,
}

impl PackageManager {
    /// Every manager kind a snapshot can carry
    pub const ALL: [PackageManager; 11] = [
        Self::Apt,
        Self::GooGet,
        Self::Yum,
        Self::Zypper,
        Self::ZypperPatch,
        Self::Wua,
        Self::Qfe,
        Self::Deb,
        Self::Rpm,
        Self::Pip,
        Self::Gem,
    ];

    /// Order in which record lists are emitted into the canonical sequence.
    ///
    /// Pip and Gem are absent: they have no wire representation.
    pub const NORMALIZATION_ORDER: [PackageManager; 9] = [
        Self::Apt,
        Self::GooGet,
        Self::Yum,
        Self::Zypper,
        Self::ZypperPatch,
        Self::Wua,
        Self::Qfe,
        Self::Deb,
        Self::Rpm,
    ];

    /// Key used for this manager in snapshot JSON
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::GooGet => "googet",
            Self::Yum => "yum",
            Self::Zypper => "zypper",
            Self::ZypperPatch => "zypperPatches",
            Self::Wua => "wua",
            Self::Qfe => "qfe",
            Self::Deb => "deb",
            Self::Rpm => "rpm",
            Self::Pip => "pip",
            Self::Gem => "gem",
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
