// src/agent.rs

//! One inventory reporting cycle, end to end
//!
//! `InventoryAgent` takes a snapshot, publishes it to guest attributes
//! (when configured), formats the canonical inventory and hands it to the
//! retry controller. Cycles on one agent never overlap: a call made while
//! another cycle is in flight returns `AgentRun::AlreadyRunning` at once.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, warn};

use crate::attributes::{write_attributes, AttributePublisher, HttpAttributePublisher, WriteSummary};
use crate::config::AgentConfig;
use crate::error::Result;
use crate::inventory::InventorySource;
use crate::report::{
    format_inventory, CycleOutcome, HttpReportingTransport, ReportController, ReportingTransport,
    RetryPolicy,
};

/// What a call to `InventoryAgent::report_inventory` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRun {
    /// The cycle ran; `attributes` is `None` when publication is disabled
    Reported {
        outcome: CycleOutcome,
        attributes: Option<WriteSummary>,
    },
    /// Another cycle was in flight, nothing was sent
    AlreadyRunning,
    /// The inventory source failed, nothing was sent
    SnapshotFailed,
}

/// Marks a cycle as in flight until dropped
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

type BoxedSource = Box<dyn InventorySource + Send + Sync>;
type BoxedTransport = Box<dyn ReportingTransport + Send + Sync>;
type BoxedPublisher = Box<dyn AttributePublisher + Send + Sync>;

pub struct InventoryAgent {
    source: BoxedSource,
    transport: BoxedTransport,
    attributes: Option<(BoxedPublisher, String)>,
    policy: RetryPolicy,
    in_flight: AtomicBool,
}

impl InventoryAgent {
    /// Create an agent that reports without publishing attributes
    pub fn new(source: BoxedSource, transport: BoxedTransport, policy: RetryPolicy) -> Self {
        Self {
            source,
            transport,
            attributes: None,
            policy,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Also publish each snapshot under `base_url`
    pub fn with_attributes(mut self, publisher: BoxedPublisher, base_url: impl Into<String>) -> Self {
        self.attributes = Some((publisher, base_url.into()));
        self
    }

    /// Build an agent with HTTP transport and publisher from configuration
    pub fn from_config(config: &AgentConfig, source: BoxedSource) -> Result<Self> {
        let transport = HttpReportingTransport::new(&config.reporting)?;
        let agent = Self::new(
            source,
            Box::new(transport),
            RetryPolicy::from_config(&config.reporting),
        );

        if !config.attributes.enabled {
            debug!("Guest attribute publication disabled");
            return Ok(agent);
        }

        let publisher = HttpAttributePublisher::new()?;
        Ok(agent.with_attributes(Box::new(publisher), config.attributes.inventory_url()))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// True while a cycle is running
    pub fn is_reporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one reporting cycle. Never fails; problems are logged.
    pub fn report_inventory(&self, cancel: &AtomicBool) -> AgentRun {
        let Some(_guard) = InFlightGuard::try_acquire(&self.in_flight) else {
            warn!("Inventory report already in progress, skipping");
            return AgentRun::AlreadyRunning;
        };

        let state = match self.source.snapshot() {
            Ok(state) => state,
            Err(e) => {
                error!("Error collecting inventory: {}", e);
                return AgentRun::SnapshotFailed;
            }
        };

        let attributes = self
            .attributes
            .as_ref()
            .map(|(publisher, base_url)| write_attributes(&state, base_url, &**publisher));

        let inventory = format_inventory(&state);
        let outcome = ReportController::new(&*self.transport, self.policy).run(&inventory, cancel);
        debug!("Inventory cycle ended {} after {} attempts", outcome.state, outcome.attempts);

        AgentRun::Reported { outcome, attributes }
    }
}
