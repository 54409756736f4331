// src/attributes/mod.rs

//! Guest attribute publication of the raw inventory
//!
//! Every top-level field of `InstanceInventory` is written to
//! `{base_url}/{FieldName}`. String fields go out as-is; package sets are
//! JSON-encoded, gzip-compressed and base64-encoded. A failed write is
//! logged and the remaining fields are still attempted.
//!
//! The field list is a static table rather than reflection, so adding a
//! field to `InstanceInventory` means adding a row to `INVENTORY_FIELDS`.

mod publisher;

pub use publisher::{encode_compressed, HttpAttributePublisher};

use thiserror::Error;
use tracing::{debug, error};

use crate::inventory::InstanceInventory;
use crate::packages::Packages;

/// A single attribute write that failed
#[derive(Error, Debug)]
pub enum AttributeError {
    #[error("failed to encode attribute {path}: {message}")]
    Encode { path: String, message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Sink for guest attributes
pub trait AttributePublisher {
    /// Write a plain string attribute
    fn publish_scalar(&self, path: &str, value: &str) -> Result<(), AttributeError>;

    /// Write a structured attribute in compressed form
    fn publish_compressed(&self, path: &str, value: &serde_json::Value)
        -> Result<(), AttributeError>;
}

/// Value of one inventory field, borrowed from the snapshot
#[derive(Debug, Clone, Copy)]
pub enum AttributeValue<'a> {
    Scalar(&'a str),
    Structured(&'a Packages),
}

/// One row of the field table
pub struct AttributeField {
    pub name: &'static str,
    pub value: fn(&InstanceInventory) -> AttributeValue<'_>,
}

/// Published fields, in publication order
pub const INVENTORY_FIELDS: &[AttributeField] = &[
    AttributeField { name: "Hostname", value: |s| AttributeValue::Scalar(&s.hostname) },
    AttributeField { name: "LongName", value: |s| AttributeValue::Scalar(&s.long_name) },
    AttributeField { name: "ShortName", value: |s| AttributeValue::Scalar(&s.short_name) },
    AttributeField { name: "Version", value: |s| AttributeValue::Scalar(&s.version) },
    AttributeField { name: "Architecture", value: |s| AttributeValue::Scalar(&s.architecture) },
    AttributeField { name: "KernelVersion", value: |s| AttributeValue::Scalar(&s.kernel_version) },
    AttributeField { name: "KernelRelease", value: |s| AttributeValue::Scalar(&s.kernel_release) },
    AttributeField {
        name: "OSConfigAgentVersion",
        value: |s| AttributeValue::Scalar(&s.agent_version),
    },
    AttributeField {
        name: "InstalledPackages",
        value: |s| AttributeValue::Structured(&s.installed_packages),
    },
    AttributeField {
        name: "PackageUpdates",
        value: |s| AttributeValue::Structured(&s.package_updates),
    },
    AttributeField { name: "LastUpdated", value: |s| AttributeValue::Scalar(&s.last_updated) },
];

/// Counts from one publication pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub failed: usize,
}

/// Publish every inventory field under `base_url`
pub fn write_attributes<P: AttributePublisher + ?Sized>(
    state: &InstanceInventory,
    base_url: &str,
    publisher: &P,
) -> WriteSummary {
    debug!("Writing instance inventory to guest attributes");

    let mut summary = WriteSummary::default();
    for field in INVENTORY_FIELDS {
        let path = format!("{}/{}", base_url, field.name);
        let result = match (field.value)(state) {
            AttributeValue::Scalar(value) => {
                debug!("postAttribute {}: {}", path, value);
                publisher.publish_scalar(&path, value)
            }
            AttributeValue::Structured(packages) => {
                debug!("postAttributeCompressed {}", path);
                serde_json::to_value(packages)
                    .map_err(|e| AttributeError::Encode {
                        path: path.clone(),
                        message: e.to_string(),
                    })
                    .and_then(|value| publisher.publish_compressed(&path, &value))
            }
        };

        match result {
            Ok(()) => summary.written += 1,
            Err(e) => {
                error!("Error writing guest attribute {}: {}", field.name, e);
                summary.failed += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::PkgInfo;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingPublisher {
        scalars: RefCell<Vec<(String, String)>>,
        structured: RefCell<Vec<(String, serde_json::Value)>>,
        fail_on: Option<&'static str>,
    }

    impl AttributePublisher for RecordingPublisher {
        fn publish_scalar(&self, path: &str, value: &str) -> Result<(), AttributeError> {
            if self.fail_on.is_some_and(|f| path.ends_with(f)) {
                return Err(AttributeError::Status { url: path.to_string(), status: 503 });
            }
            self.scalars.borrow_mut().push((path.to_string(), value.to_string()));
            Ok(())
        }

        fn publish_compressed(
            &self,
            path: &str,
            value: &serde_json::Value,
        ) -> Result<(), AttributeError> {
            if self.fail_on.is_some_and(|f| path.ends_with(f)) {
                return Err(AttributeError::Status { url: path.to_string(), status: 503 });
            }
            self.structured.borrow_mut().push((path.to_string(), value.clone()));
            Ok(())
        }
    }

    fn snapshot() -> InstanceInventory {
        InstanceInventory {
            hostname: "web-1".to_string(),
            short_name: "debian".to_string(),
            installed_packages: Packages {
                deb: vec![PkgInfo::new("bash", "amd64", "5.2-1")],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_every_field_published_once() {
        let publisher = RecordingPublisher::default();
        let summary = write_attributes(&snapshot(), "http://md/guestInventory", &publisher);

        assert_eq!(summary, WriteSummary { written: INVENTORY_FIELDS.len(), failed: 0 });
        assert_eq!(publisher.scalars.borrow().len(), 9);
        assert_eq!(publisher.structured.borrow().len(), 2);

        let scalars = publisher.scalars.borrow();
        assert_eq!(scalars[0], ("http://md/guestInventory/Hostname".to_string(), "web-1".to_string()));
        assert!(scalars.iter().any(|(p, v)| p.ends_with("/ShortName") && v == "debian"));

        let structured = publisher.structured.borrow();
        assert_eq!(structured[0].0, "http://md/guestInventory/InstalledPackages");
        assert_eq!(structured[0].1["deb"][0]["Name"], "bash");
        assert_eq!(structured[1].0, "http://md/guestInventory/PackageUpdates");
    }

    #[test]
    fn test_failed_write_does_not_stop_others() {
        let publisher = RecordingPublisher {
            fail_on: Some("/Hostname"),
            ..Default::default()
        };
        let summary = write_attributes(&snapshot(), "http://md/guestInventory", &publisher);

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.written, INVENTORY_FIELDS.len() - 1);
        assert!(publisher
            .scalars
            .borrow()
            .iter()
            .all(|(p, _)| !p.ends_with("/Hostname")));
    }

    #[test]
    fn test_field_names_unique() {
        let mut names: Vec<_> = INVENTORY_FIELDS.iter().map(|f| f.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), INVENTORY_FIELDS.len());
    }
}
