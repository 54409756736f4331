// src/report/retry.rs

//! Reporting retry controller
//!
//! One cycle sends the inventory, then follows the endpoint's lead: if the
//! reply asks for the full inventory, the cycle escalates and sends again
//! with the full-report flag set. Escalations are bounded by
//! `max_retries`; once the budget is spent the cycle aborts.
//!
//! The escalation logic is the pure `transition` function. `ReportController`
//! wraps it with the transport calls, logging, delays and cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use super::format::Inventory;
use super::transport::{ReportInventoryResponse, ReportingTransport, TransportError};
use crate::config::ReportingConfig;

/// Where a reporting cycle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportState {
    /// Next attempt sends without the full-report flag
    Sending,
    /// Next attempt sends with the full-report flag
    Escalated,
    /// The endpoint accepted the report
    Done,
    /// The escalation budget ran out
    Aborted,
    /// The caller cancelled the cycle before it finished
    Cancelled,
}

impl ReportState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted | Self::Cancelled)
    }
}

impl std::fmt::Display for ReportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sending => write!(f, "sending"),
            Self::Escalated => write!(f, "escalated"),
            Self::Done => write!(f, "done"),
            Self::Aborted => write!(f, "aborted"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Result of one remote exchange as seen by the controller
#[derive(Debug)]
pub struct ReportOutcome {
    pub report_full_inventory: bool,
    pub error: Option<TransportError>,
}

impl From<std::result::Result<ReportInventoryResponse, TransportError>> for ReportOutcome {
    fn from(result: std::result::Result<ReportInventoryResponse, TransportError>) -> Self {
        match result {
            Ok(response) => Self {
                report_full_inventory: response.report_full_inventory,
                error: None,
            },
            // A failed exchange carries no request for a full report
            Err(e) => Self {
                report_full_inventory: false,
                error: Some(e),
            },
        }
    }
}

/// Controller state between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub state: ReportState,
    /// Escalations performed so far
    pub retries: u32,
}

impl RetryState {
    pub fn initial() -> Self {
        Self {
            state: ReportState::Sending,
            retries: 0,
        }
    }

    /// Flag to pass on the next attempt
    pub fn include_full_inventory(&self) -> bool {
        self.state == ReportState::Escalated
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Advance a cycle after one attempt
///
/// Terminal states are absorbing.
pub fn transition(current: RetryState, report_full_inventory: bool, max_retries: u32) -> RetryState {
    match current.state {
        ReportState::Sending | ReportState::Escalated => {
            if !report_full_inventory {
                RetryState {
                    state: ReportState::Done,
                    ..current
                }
            } else if current.retries >= max_retries {
                RetryState {
                    state: ReportState::Aborted,
                    ..current
                }
            } else {
                RetryState {
                    state: ReportState::Escalated,
                    retries: current.retries + 1,
                }
            }
        }
        ReportState::Done | ReportState::Aborted | ReportState::Cancelled => current,
    }
}

/// Escalation budget and pacing for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Delay before the n-th escalated attempt is `retry_delay * n`
    pub retry_delay: Duration,
    pub max_retry_delay: Duration,
}

impl RetryPolicy {
    /// Back-to-back attempts with the given escalation budget
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            retry_delay: Duration::ZERO,
            max_retry_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &ReportingConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
            max_retry_delay: config.max_retry_delay(),
        }
    }

    /// Pause before the attempt that follows escalation number `retries`
    pub fn delay_for(&self, retries: u32) -> Duration {
        self.retry_delay
            .saturating_mul(retries)
            .min(self.max_retry_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_RETRIES)
    }
}

/// Longest uninterrupted sleep while waiting out a retry delay
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Sleep for `delay`, waking every `CANCEL_POLL_INTERVAL` to check `cancel`.
/// Returns early once the flag is set.
fn sleep_unless_cancelled(delay: Duration, cancel: &AtomicBool) {
    let deadline = Instant::now() + delay;
    loop {
        if cancel.load(Ordering::SeqCst) {
            return;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return;
        }
        std::thread::sleep(remaining.min(CANCEL_POLL_INTERVAL));
    }
}

/// How a cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub state: ReportState,
    /// Remote exchanges issued during the cycle
    pub attempts: u32,
}

/// Drives one reporting cycle against a transport
pub struct ReportController<'a, T: ReportingTransport + ?Sized> {
    transport: &'a T,
    policy: RetryPolicy,
}

impl<'a, T: ReportingTransport + ?Sized> ReportController<'a, T> {
    pub fn new(transport: &'a T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Report `inventory` until the endpoint is satisfied, the budget is
    /// spent, or `cancel` is set. Never fails; problems are logged.
    pub fn run(&self, inventory: &Inventory, cancel: &AtomicBool) -> CycleOutcome {
        debug!("Reporting instance inventory to agent endpoint");

        let mut current = RetryState::initial();
        let mut attempts = 0;

        loop {
            if cancel.load(Ordering::SeqCst) {
                info!("Inventory report cancelled after {} attempts", attempts);
                return CycleOutcome {
                    state: ReportState::Cancelled,
                    attempts,
                };
            }

            let report_full = current.include_full_inventory();
            attempts += 1;
            let outcome = ReportOutcome::from(self.transport.report_inventory(inventory, report_full));
            if let Some(err) = &outcome.error {
                error!("Error reporting inventory: {}", err);
            }

            current = transition(current, outcome.report_full_inventory, self.policy.max_retries);
            match current.state {
                ReportState::Done => {
                    debug!("Inventory reported after {} attempts", attempts);
                    return CycleOutcome {
                        state: current.state,
                        attempts,
                    };
                }
                ReportState::Aborted => {
                    error!(
                        "Error reporting inventory: exceeded {} retries ({} attempts)",
                        self.policy.max_retries, attempts
                    );
                    return CycleOutcome {
                        state: current.state,
                        attempts,
                    };
                }
                ReportState::Sending | ReportState::Escalated | ReportState::Cancelled => {
                    debug!(
                        "Endpoint requested full inventory (escalation {}/{})",
                        current.retries, self.policy.max_retries
                    );
                    let delay = self.policy.delay_for(current.retries);
                    if !delay.is_zero() {
                        sleep_unless_cancelled(delay, cancel);
                    }
                }
            }
        }
    }
}
