// src/report/mod.rs

//! Inventory reporting
//!
//! - `format`: raw snapshot to canonical `Inventory`
//! - `transport`: the remote exchange
//! - `retry`: the escalation state machine that drives the exchange

pub mod format;
pub mod retry;
pub mod transport;

pub use format::{format_inventory, Inventory, OsInfo};
pub use retry::{
    transition, CycleOutcome, ReportController, ReportOutcome, ReportState, RetryPolicy,
    RetryState,
};
pub use transport::{
    HttpReportingTransport, ReportInventoryRequest, ReportInventoryResponse, ReportingTransport,
    TransportError,
};
