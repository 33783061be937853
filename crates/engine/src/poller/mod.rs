// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-source pollers.
//!
//! Every poller follows the same loop: wait one interval (or observe
//! cancellation), make one uninterruptible API call, act on the answer.
//! The first call happens one full interval after the poller starts.

pub(crate) mod guest;
pub(crate) mod scan;
pub(crate) mod serial;
pub(crate) mod stopped;

use ib_adapters::{ComputeAdapter, ComputeError};
use ib_core::InstanceRef;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Consecutive transient API errors a poller tolerates before failing.
pub const ERROR_BUDGET: u32 = 3;

/// Non-error end of a poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The awaited signal was observed
    Signalled,
    /// Cancellation was observed before a signal
    Cancelled,
}

/// Ticker whose first tick fires one `period` from now.
pub(crate) fn ticker(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Wait for the next tick. Returns `false` if cancelled first.
pub(crate) async fn next_tick(ticker: &mut Interval, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = ticker.tick() => true,
    }
}

/// Counts consecutive transient failures.
#[derive(Debug, Default)]
pub(crate) struct ErrorBudget {
    consecutive: u32,
}

impl ErrorBudget {
    /// Record a failure. Returns `true` once the budget is exhausted.
    pub(crate) fn charge(&mut self) -> bool {
        if self.consecutive < ERROR_BUDGET {
            self.consecutive += 1;
            false
        } else {
            true
        }
    }

    pub(crate) fn reset(&mut self) {
        self.consecutive = 0;
    }

    pub(crate) fn consecutive(&self) -> u32 {
        self.consecutive
    }
}

/// Instance status looked up after a failed fetch.
#[derive(Debug)]
pub(crate) struct Diagnosis {
    /// Instance is stopping, stopped or terminated
    pub(crate) powered_down: bool,
    /// The fetch error with the status (or status error) appended
    pub(crate) detail: String,
}

pub(crate) async fn diagnose<C: ComputeAdapter>(
    compute: &C,
    instance: &InstanceRef,
    err: &ComputeError,
) -> Diagnosis {
    match compute.instance_status(instance).await {
        Ok(status) => Diagnosis {
            powered_down: status.is_powered_down(),
            detail: format!("{}, InstanceStatus: {:?}", err, status.as_str()),
        },
        Err(status_err) => Diagnosis {
            powered_down: false,
            detail: format!("{}, error getting InstanceStatus: {}", err, status_err),
        },
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
