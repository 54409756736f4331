// src/config.rs

//! Agent configuration
//!
//! Loaded from a TOML file. Every field has a default, so a missing or
//! empty file yields a working configuration.
//!
//! ```toml
//! [reporting]
//! endpoint = "https://osconfig.googleapis.com"
//! instance = "projects/p/zones/us-central1-a/instances/1234"
//! max_retries = 5
//! retry_delay_ms = 0
//!
//! [attributes]
//! enabled = true
//! base_url = "http://metadata.google.internal/computeMetadata/v1/instance/guest-attributes"
//! key = "guestInventory"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Default path for the agent configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/guest-inventory/config.toml";

/// Maximum number of full-report escalations per cycle
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Guest attributes root on the metadata server
pub const DEFAULT_ATTRIBUTES_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/guest-attributes";

/// Attribute namespace that inventory fields are written under
pub const DEFAULT_ATTRIBUTES_KEY: &str = "guestInventory";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub reporting: ReportingConfig,
    pub attributes: AttributesConfig,
}

impl AgentConfig {
    /// Load configuration from `path`, or defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.reporting.timeout_secs == 0 {
            return Err(Error::ConfigError(
                "reporting.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.reporting.max_retry_delay_ms < self.reporting.retry_delay_ms {
            return Err(Error::ConfigError(format!(
                "reporting.max_retry_delay_ms ({}) is below reporting.retry_delay_ms ({})",
                self.reporting.max_retry_delay_ms, self.reporting.retry_delay_ms
            )));
        }
        Ok(())
    }
}

/// Settings for the reporting endpoint and retry loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Base URL of the control plane
    pub endpoint: String,
    /// Instance resource name the inventory is reported for
    pub instance: String,
    pub max_retries: u32,
    /// Base delay between attempts; 0 sends retries back-to-back
    pub retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://osconfig.googleapis.com".to_string(),
            instance: String::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: 0,
            max_retry_delay_ms: 30_000,
            timeout_secs: 30,
        }
    }
}

impl ReportingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn max_retry_delay(&self) -> Duration {
        Duration::from_millis(self.max_retry_delay_ms)
    }
}

/// Settings for guest attribute publication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributesConfig {
    pub enabled: bool,
    pub base_url: String,
    pub key: String,
}

impl Default for AttributesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_ATTRIBUTES_URL.to_string(),
            key: DEFAULT_ATTRIBUTES_KEY.to_string(),
        }
    }
}

impl AttributesConfig {
    /// Path prefix under which every inventory field is published
    pub fn inventory_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.key)
    }
}
