// src/error.rs

//! Error types for the inventory core
//!
//! `Error` is the crate-wide error returned by fallible setup paths
//! (configuration, snapshot loading, client construction). The three
//! contained error kinds of a reporting cycle have their own types and
//! are logged where they occur, never converted into `Error`:
//! `TransportError` (see `report::transport`), `AttributeError` (see
//! `attributes`) and `DateParseError` (see `packages::mapper`).

use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be read or was invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Client or component initialization failed
    #[error("Initialization error: {0}")]
    InitError(String),

    /// A config file exists but could not be read
    #[error("I/O error: {0}")]
    IoError(String),

    /// Input could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The inventory source failed to produce a snapshot
    #[error("Inventory source error: {0}")]
    SourceError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}

/// Result type for inventory operations
pub type Result<T> = std::result::Result<T, Error>;
