// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ib-workflow: wait-for-instance-signal step definitions, parsing and validation

mod parser;
mod signal;
mod spec;
mod step;

pub use parser::{load_step, parse_step, parse_step_with_format, Format, ParseError};
pub use signal::{
    FailureMatches, GuestAttributeDef, InstanceSignalDef, SerialOutputDef,
    DEFAULT_GUEST_ATTRIBUTE_KEY, DEFAULT_GUEST_ATTRIBUTE_NAMESPACE, DEFAULT_INTERVAL,
};
pub use spec::{GuestAttributeMatcher, SerialOutputMatcher, SignalSource, SignalSpec};
pub use step::{WaitMode, WaitStepDef};
