// src/report/transport.rs

//! Transport to the reporting endpoint
//!
//! The controller only sees `ReportingTransport`. The HTTP implementation
//! always sends the inventory checksum and attaches the inventory body
//! only when a full report was requested, so an unchanged instance costs
//! the endpoint a single comparison.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::format::Inventory;
use crate::config::ReportingConfig;
use crate::error::{Error, Result};

/// A remote exchange that did not produce a usable response
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to encode inventory: {0}")]
    Encode(String),

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Endpoint reply to one inventory report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInventoryResponse {
    /// The endpoint wants the whole inventory on the next attempt
    #[serde(default)]
    pub report_full_inventory: bool,
}

/// Carrier of inventory reports to the control plane
pub trait ReportingTransport {
    /// Send one report; `report_full` asks to include the whole inventory
    fn report_inventory(
        &self,
        inventory: &Inventory,
        report_full: bool,
    ) -> std::result::Result<ReportInventoryResponse, TransportError>;
}

/// Request body posted to the endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInventoryRequest<'a> {
    pub inventory_checksum: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<&'a Inventory>,
}

impl<'a> ReportInventoryRequest<'a> {
    pub fn new(
        inventory: &'a Inventory,
        report_full: bool,
    ) -> std::result::Result<Self, TransportError> {
        let inventory_checksum = inventory
            .checksum()
            .map_err(|e| TransportError::Encode(e.to_string()))?;

        Ok(Self {
            inventory_checksum,
            inventory: report_full.then_some(inventory),
        })
    }
}

/// JSON-over-HTTP transport
pub struct HttpReportingTransport {
    client: Client,
    url: String,
}

impl HttpReportingTransport {
    /// Create a transport for the configured endpoint and instance
    pub fn new(config: &ReportingConfig) -> Result<Self> {
        if config.instance.is_empty() {
            return Err(Error::ConfigError(
                "reporting.instance must be set to report inventory".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: report_url(&config.endpoint, &config.instance),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// URL of the report method for one instance
pub fn report_url(endpoint: &str, instance: &str) -> String {
    format!(
        "{}/v1/{}:reportInventory",
        endpoint.trim_end_matches('/'),
        instance.trim_start_matches('/')
    )
}

impl ReportingTransport for HttpReportingTransport {
    fn report_inventory(
        &self,
        inventory: &Inventory,
        report_full: bool,
    ) -> std::result::Result<ReportInventoryResponse, TransportError> {
        let request = ReportInventoryRequest::new(inventory, report_full)?;
        debug!(
            "Reporting inventory checksum {} to {} (full: {})",
            request.inventory_checksum, self.url, report_full
        );

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .map_err(|e| TransportError::Request {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        response.json().map_err(|e| TransportError::Decode {
            url: self.url.clone(),
            message: e.to_string(),
        })
    }
}
