// tests/common/mod.rs

//! Shared fixtures and fakes for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use guest_inventory::packages::{PkgInfo, QfePackage, WuaPackage, ZypperPatch};
use guest_inventory::report::ReportInventoryResponse;
use guest_inventory::{
    AttributeError, AttributePublisher, InstanceInventory, Inventory, Packages, ReportingTransport,
    TransportError,
};

/// A Debian instance with deb, pip and apt update records.
pub fn debian_snapshot() -> InstanceInventory {
    InstanceInventory {
        hostname: "web-1".to_string(),
        long_name: "Debian GNU/Linux 12 (bookworm)".to_string(),
        short_name: "debian".to_string(),
        version: "12".to_string(),
        architecture: "x86_64".to_string(),
        kernel_version: "#1 SMP PREEMPT_DYNAMIC Debian 6.1.76-1".to_string(),
        kernel_release: "6.1.0-18-cloud-amd64".to_string(),
        agent_version: "20240320.00".to_string(),
        installed_packages: Packages {
            deb: vec![
                PkgInfo::new("bash", "amd64", "5.2.15-2+b2"),
                PkgInfo::new("openssl", "amd64", "3.0.11-1~deb12u2"),
            ],
            pip: vec![PkgInfo::new("requests", "all", "2.28.1")],
            gem: vec![PkgInfo::new("rake", "all", "13.0.6")],
            ..Default::default()
        },
        package_updates: Packages {
            apt: vec![PkgInfo::new("openssl", "amd64", "3.0.13-1~deb12u1")],
            ..Default::default()
        },
        last_updated: "2024-03-20T10:00:00Z".to_string(),
    }
}

/// A SLES instance with raw rpm records, zypper updates and patches.
pub fn sles_snapshot() -> InstanceInventory {
    InstanceInventory {
        hostname: "sap-1".to_string(),
        long_name: "SUSE Linux Enterprise Server 15 SP5".to_string(),
        short_name: "sles".to_string(),
        version: "15.5".to_string(),
        architecture: "x86_64".to_string(),
        kernel_version: "#1 SMP PREEMPT_DYNAMIC".to_string(),
        kernel_release: "5.14.21-150500.55.52-default".to_string(),
        agent_version: "20240320.00".to_string(),
        installed_packages: Packages {
            rpm: vec![
                PkgInfo::new("zypper", "x86_64", "1.14.68-150400.3.40.1"),
                PkgInfo::new("libopenssl3", "x86_64", "3.0.8-150500.5.20.1"),
            ],
            ..Default::default()
        },
        package_updates: Packages {
            zypper: vec![PkgInfo::new("libopenssl3", "x86_64", "3.0.8-150500.5.27.1")],
            zypper_patches: vec![ZypperPatch {
                name: "SUSE-SLE-Module-Basesystem-15-SP5-2024-871".to_string(),
                category: "security".to_string(),
                severity: "important".to_string(),
                summary: "Security update for openssl-3".to_string(),
            }],
            ..Default::default()
        },
        last_updated: "2024-03-20T10:00:00Z".to_string(),
    }
}

/// A Windows instance with googet, WUA and QFE records.
pub fn windows_snapshot() -> InstanceInventory {
    InstanceInventory {
        hostname: "win-1".to_string(),
        long_name: "Microsoft Windows Server 2022 Datacenter".to_string(),
        short_name: "windows".to_string(),
        version: "10.0.20348".to_string(),
        architecture: "x86_64".to_string(),
        kernel_version: "10.0.20348.2340".to_string(),
        kernel_release: "10.0.20348".to_string(),
        agent_version: "20240320.00".to_string(),
        installed_packages: Packages {
            googet: vec![PkgInfo::new("googet", "x86_64", "2.18.5@0")],
            qfe: vec![
                QfePackage {
                    caption: "http://support.microsoft.com/?kbid=5034439".to_string(),
                    description: "Security Update".to_string(),
                    hot_fix_id: "KB5034439".to_string(),
                    installed_on: "3/15/2024".to_string(),
                },
                QfePackage {
                    caption: String::new(),
                    description: "Update".to_string(),
                    hot_fix_id: "KB5012170".to_string(),
                    installed_on: "not-a-date".to_string(),
                },
            ],
            ..Default::default()
        },
        package_updates: Packages {
            wua: vec![WuaPackage {
                title: "2024-03 Cumulative Update for Microsoft server operating system".to_string(),
                description: "Install this update to resolve issues in Windows.".to_string(),
                categories: vec!["Security".to_string(), "Critical".to_string()],
                category_ids: vec!["cat1".to_string(), "cat2".to_string()],
                kb_article_ids: vec!["5035857".to_string()],
                support_url: "https://support.microsoft.com/help/5035857".to_string(),
                update_id: "0a6d8a3b-1d30-4e5f-9d1c-7d8f6f6f0c9a".to_string(),
                revision_number: 1,
                last_deployment_change_time: Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap(),
            }],
            ..Default::default()
        },
        last_updated: "2024-03-20T10:00:00Z".to_string(),
    }
}

/// One scripted transport reply; `None` is a transport error.
pub type Reply = Option<bool>;

/// Transport that replays scripted replies and records each call's flag.
///
/// Once the script runs out the last reply repeats.
pub struct RecordingTransport {
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Reply>,
    pub calls: Mutex<Vec<(bool, Inventory)>>,
}

impl RecordingTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(Some(false)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn flags(&self) -> Vec<bool> {
        self.calls.lock().unwrap().iter().map(|(full, _)| *full).collect()
    }
}

impl ReportingTransport for RecordingTransport {
    fn report_inventory(
        &self,
        inventory: &Inventory,
        report_full: bool,
    ) -> Result<ReportInventoryResponse, TransportError> {
        self.calls.lock().unwrap().push((report_full, inventory.clone()));

        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.replies.lock().unwrap().pop_front() {
            *last = next;
        }

        match *last {
            Some(full) => Ok(ReportInventoryResponse {
                report_full_inventory: full,
            }),
            None => Err(TransportError::Status {
                url: "http://endpoint.test".to_string(),
                status: 503,
            }),
        }
    }
}

/// Publisher that keeps every write in memory.
#[derive(Default)]
pub struct RecordingPublisher {
    pub writes: Mutex<Vec<(String, String)>>,
}

impl RecordingPublisher {
    pub fn paths(&self) -> Vec<String> {
        self.writes.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }
}

impl AttributePublisher for RecordingPublisher {
    fn publish_scalar(&self, path: &str, value: &str) -> Result<(), AttributeError> {
        self.writes
            .lock()
            .unwrap()
            .push((path.to_string(), value.to_string()));
        Ok(())
    }

    fn publish_compressed(
        &self,
        path: &str,
        value: &serde_json::Value,
    ) -> Result<(), AttributeError> {
        self.writes
            .lock()
            .unwrap()
            .push((path.to_string(), value.to_string()));
        Ok(())
    }
}
