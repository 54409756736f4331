// src/packages/mod.rs

//! Package taxonomy for inventory reports
//!
//! Raw records come from the inventory source in per-manager shapes
//! (`raw`). The mapper converts single records into the canonical wire
//! variants (`canonical`), and the normalizer flattens a whole package set
//! into one ordered sequence.

pub mod canonical;
pub mod mapper;
pub mod normalize;
pub mod raw;

pub use canonical::{
    SoftwarePackage, VersionedPackage, WindowsQuickFixEngineeringPackage, WindowsUpdateCategory,
    WindowsUpdatePackage, ZypperPatchDetails,
};
pub use mapper::DateParseError;
pub use normalize::{normalize_packages, SUSE_SHORT_NAME};
pub use raw::{PackageManager, Packages, PkgInfo, QfePackage, WuaPackage, ZypperPatch};
