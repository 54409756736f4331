// src/packages/mapper.rs

//! Per-manager conversion of raw records into canonical packages
//!
//! Every function here is pure apart from logging. None of them fail: a
//! malformed hotfix date falls back to the zero instant, and mismatched
//! WUA category lists are zipped to the shorter length.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use thiserror::Error;
use tracing::{error, warn};

use super::canonical::{
    SoftwarePackage, VersionedPackage, WindowsQuickFixEngineeringPackage, WindowsUpdateCategory,
    WindowsUpdatePackage, ZypperPatchDetails,
};
use super::raw::{PkgInfo, QfePackage, WuaPackage, ZypperPatch};

/// Layout of the QFE `InstalledOn` field (month/day/year)
const QFE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Unix seconds of 0001-01-01T00:00:00Z, the zero-value instant
const ZERO_INSTANT_SECS: i64 = -62_135_596_800;

/// A hotfix `InstalledOn` value that is not a `M/D/YYYY` date
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse QFE InstalledOn date {value:?}: {reason}")]
pub struct DateParseError {
    pub value: String,
    pub reason: String,
}

/// The instant used when a record carries no usable timestamp
pub fn zero_instant() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_INSTANT_SECS, 0).unwrap_or_default()
}

/// Parse a QFE `InstalledOn` string into midnight UTC of that day
pub fn parse_installed_on(value: &str) -> Result<DateTime<Utc>, DateParseError> {
    check_date_shape(value).map_err(|reason| DateParseError {
        value: value.to_string(),
        reason: reason.to_string(),
    })?;

    let date = NaiveDate::parse_from_str(value, QFE_DATE_FORMAT).map_err(|e| DateParseError {
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// Reject anything chrono would accept but `M/D/YYYY` does not: signs,
/// padding spaces, short or long years.
fn check_date_shape(value: &str) -> Result<(), &'static str> {
    let parts: Vec<&str> = value.split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return Err("expected month/day/year");
    };

    let digits = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(month, 1, 2) || !digits(day, 1, 2) {
        return Err("month and day must be one or two digits");
    }
    if !digits(year, 4, 4) {
        return Err("year must be four digits");
    }
    Ok(())
}

fn versioned(pkg: &PkgInfo) -> VersionedPackage {
    VersionedPackage {
        package_name: pkg.name.clone(),
        architecture: pkg.arch.clone(),
        version: pkg.version.clone(),
    }
}

pub fn apt_package(pkg: &PkgInfo) -> SoftwarePackage {
    SoftwarePackage::AptPackage(versioned(pkg))
}

pub fn googet_package(pkg: &PkgInfo) -> SoftwarePackage {
    SoftwarePackage::GoogetPackage(versioned(pkg))
}

pub fn yum_package(pkg: &PkgInfo) -> SoftwarePackage {
    SoftwarePackage::YumPackage(versioned(pkg))
}

pub fn zypper_package(pkg: &PkgInfo) -> SoftwarePackage {
    SoftwarePackage::ZypperPackage(versioned(pkg))
}

pub fn zypper_patch(patch: &ZypperPatch) -> SoftwarePackage {
    SoftwarePackage::ZypperPatch(ZypperPatchDetails {
        patch_name: patch.name.clone(),
        category: patch.category.clone(),
        severity: patch.severity.clone(),
        summary: patch.summary.clone(),
    })
}

/// Map a Windows Update entry
///
/// Category names and ids are paired by position. Extra entries on the
/// longer side are dropped.
pub fn wua_package(pkg: &WuaPackage) -> SoftwarePackage {
    if pkg.categories.len() != pkg.category_ids.len() {
        warn!(
            "WUA update {} has {} categories but {} category ids, pairing the first {}",
            pkg.update_id,
            pkg.categories.len(),
            pkg.category_ids.len(),
            pkg.categories.len().min(pkg.category_ids.len())
        );
    }

    let categories = pkg
        .categories
        .iter()
        .zip(&pkg.category_ids)
        .map(|(name, id)| WindowsUpdateCategory {
            id: id.clone(),
            name: name.clone(),
        })
        .collect();

    // TODO: populate from WuaPackage::support_url once the collector reports MoreInfoUrls as a list
    let support_url = Vec::new();

    SoftwarePackage::WuaPackage(WindowsUpdatePackage {
        title: pkg.title.clone(),
        description: pkg.description.clone(),
        categories,
        kb_article_ids: pkg.kb_article_ids.clone(),
        support_url,
        update_id: pkg.update_id.clone(),
        revision_number: pkg.revision_number,
        last_deployment_change_time: pkg.last_deployment_change_time,
    })
}

/// Map a QFE hotfix entry, falling back to the zero instant on a bad date
pub fn qfe_package(pkg: &QfePackage) -> SoftwarePackage {
    let install_time = match parse_installed_on(&pkg.installed_on) {
        Ok(time) => time,
        Err(e) => {
            error!("Error parsing QFE InstalledOn date for {}: {}", pkg.hot_fix_id, e);
            zero_instant()
        }
    };

    SoftwarePackage::QfePackage(WindowsQuickFixEngineeringPackage {
        caption: pkg.caption.clone(),
        description: pkg.description.clone(),
        hot_fix_id: pkg.hot_fix_id.clone(),
        install_time,
    })
}
