// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ib-core: Shared types for the image-build workflow engine

pub mod macros;

pub mod duration;
pub mod instance;
pub mod output;

pub use duration::parse_duration;
pub use instance::{InstanceRef, InstanceStatus};
pub use output::OutputStore;
