// src/attributes/publisher.rs

//! HTTP guest attribute publisher for the metadata server

use std::io::Write;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::GzEncoder;
use reqwest::blocking::Client;
use tracing::debug;

use super::{AttributeError, AttributePublisher};
use crate::error::{Error, Result};

/// Timeout for a single attribute write
const ATTRIBUTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Gzip then base64 a JSON value, the form used for structured attributes
pub fn encode_compressed(path: &str, value: &serde_json::Value) -> std::result::Result<String, AttributeError> {
    let encode_err = |e: std::io::Error| AttributeError::Encode {
        path: path.to_string(),
        message: e.to_string(),
    };

    let json = serde_json::to_vec(value).map_err(|e| AttributeError::Encode {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json).map_err(encode_err)?;
    let compressed = encoder.finish().map_err(encode_err)?;

    Ok(STANDARD.encode(compressed))
}

/// Writes attributes with `PUT` requests to the metadata server
pub struct HttpAttributePublisher {
    client: Client,
}

impl HttpAttributePublisher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(ATTRIBUTE_TIMEOUT)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn put(&self, url: &str, body: String) -> std::result::Result<(), AttributeError> {
        let response = self
            .client
            .put(url)
            .header("Metadata-Flavor", "Google")
            .body(body)
            .send()
            .map_err(|e| AttributeError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(AttributeError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

impl AttributePublisher for HttpAttributePublisher {
    fn publish_scalar(&self, path: &str, value: &str) -> std::result::Result<(), AttributeError> {
        self.put(path, value.to_string())
    }

    fn publish_compressed(
        &self,
        path: &str,
        value: &serde_json::Value,
    ) -> std::result::Result<(), AttributeError> {
        let body = encode_compressed(path, value)?;
        debug!("Compressed attribute {} to {} bytes", path, body.len());
        self.put(path, body)
    }
}
