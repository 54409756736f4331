// src/lib.rs

//! Guest Inventory
//!
//! Inventory normalization and reporting core of a guest instance agent.
//! Converts a platform-specific snapshot of installed and available
//! packages into one canonical inventory and reports it to a control plane
//! under a bounded, server-directed retry protocol.
//!
//! # Architecture
//!
//! - `packages`: per-manager records, canonical wire variants, mapping and
//!   normalization
//! - `inventory`: raw snapshots and where they come from
//! - `report`: canonical inventory assembly, transport, retry controller
//! - `attributes`: guest attribute publication of the raw snapshot
//! - `agent`: one full reporting cycle

pub mod agent;
pub mod attributes;
pub mod config;
mod error;
pub mod inventory;
pub mod packages;
pub mod report;

pub use agent::{AgentRun, InventoryAgent};
pub use attributes::{write_attributes, AttributeError, AttributePublisher, WriteSummary};
pub use config::AgentConfig;
pub use error::{Error, Result};
pub use inventory::{FileInventorySource, InstanceInventory, InventorySource};
pub use packages::{normalize_packages, DateParseError, Packages, SoftwarePackage};
pub use report::{
    format_inventory, CycleOutcome, Inventory, ReportController, ReportState, ReportingTransport,
    RetryPolicy, TransportError,
};
