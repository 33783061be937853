// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ib-engine: Runs wait-for-instance-signal steps.
//!
//! Each instance gets a [`SignalRace`] over its configured sources (stopped,
//! serial output, guest attribute). The [`WaitOrchestrator`] runs one race
//! per instance and resolves the step in wait-for-all or wait-for-any mode.

mod context;
mod error;
mod extract;
mod poller;
mod race;
mod registry;
mod step;
mod wait;

#[cfg(test)]
mod test_helpers;

pub use context::StepContext;
pub use error::WaitError;
pub use extract::{extract_output_value, publish_output_value};
pub use poller::guest::{effective_interval, GUEST_ATTRIBUTE_MIN_INTERVAL};
pub use poller::scan::{PollCursor, ScanEvent, SerialScanner};
pub use poller::{PollOutcome, ERROR_BUDGET};
pub use race::SignalRace;
pub use registry::{InMemoryInstanceRegistry, InstanceRegistry, RegistryError};
pub use step::WaitStep;
pub use wait::WaitOrchestrator;
