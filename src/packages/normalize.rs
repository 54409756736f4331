// src/packages/normalize.rs

//! Package taxonomy normalization
//!
//! Flattens the per-manager lists of a snapshot into one ordered sequence
//! of canonical packages. Managers are visited in
//! `PackageManager::NORMALIZATION_ORDER`; within a manager, records keep
//! their source order.
//!
//! Cross-mapping:
//! - deb records are emitted as apt packages
//! - rpm records are emitted as zypper packages on SUSE, yum elsewhere
//! - pip and gem records are dropped

use tracing::debug;

use super::canonical::SoftwarePackage;
use super::mapper;
use super::raw::{PackageManager, Packages};

/// Distribution short name that routes rpm records to zypper
pub const SUSE_SHORT_NAME: &str = "sles";

/// Normalize one package set for the distribution named by `short_name`
pub fn normalize_packages(packages: &Packages, short_name: &str) -> Vec<SoftwarePackage> {
    let mut normalized = Vec::new();

    for manager in PackageManager::NORMALIZATION_ORDER {
        let before = normalized.len();
        append_manager(&mut normalized, packages, manager, short_name);

        let added = normalized.len() - before;
        if added > 0 {
            debug!("Normalized {} {} records", added, manager);
        }
    }

    for manager in [PackageManager::Pip, PackageManager::Gem] {
        let skipped = packages.count(manager);
        if skipped > 0 {
            debug!("Skipping {} {} records", skipped, manager);
        }
    }

    normalized
}

fn append_manager(
    out: &mut Vec<SoftwarePackage>,
    packages: &Packages,
    manager: PackageManager,
    short_name: &str,
) {
    match manager {
        PackageManager::Apt => out.extend(packages.apt.iter().map(mapper::apt_package)),
        PackageManager::GooGet => out.extend(packages.googet.iter().map(mapper::googet_package)),
        PackageManager::Yum => out.extend(packages.yum.iter().map(mapper::yum_package)),
        PackageManager::Zypper => out.extend(packages.zypper.iter().map(mapper::zypper_package)),
        PackageManager::ZypperPatch => {
            out.extend(packages.zypper_patches.iter().map(mapper::zypper_patch))
        }
        PackageManager::Wua => out.extend(packages.wua.iter().map(mapper::wua_package)),
        PackageManager::Qfe => out.extend(packages.qfe.iter().map(mapper::qfe_package)),
        PackageManager::Deb => out.extend(packages.deb.iter().map(mapper::apt_package)),
        PackageManager::Rpm => {
            if short_name == SUSE_SHORT_NAME {
                out.extend(packages.rpm.iter().map(mapper::zypper_package));
            } else {
                out.extend(packages.rpm.iter().map(mapper::yum_package));
            }
        }
        // no wire representation; never in NORMALIZATION_ORDER
        PackageManager::Pip | PackageManager::Gem => {}
    }
}
