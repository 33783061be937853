// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Capabilities the wait engine consumes from its host: the compute API and a
//! step-scoped log sink.

pub mod compute;
pub mod step_log;

pub use compute::{ComputeAdapter, ComputeError, SerialPortOutput};
pub use step_log::{StepLog, TracingStepLog};

#[cfg(any(test, feature = "test-support"))]
pub use compute::{ComputeCall, FakeComputeAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use step_log::{FakeStepLog, StepLogLine};
