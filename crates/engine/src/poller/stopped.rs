// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wait for an instance to reach a stopped power state.

use super::{next_tick, ticker, PollOutcome};
use crate::context::StepContext;
use crate::error::WaitError;
use ib_adapters::{ComputeAdapter, StepLog};
use ib_core::InstanceRef;
use std::time::Duration;

/// Poll the power state every `interval` until it reports stopped.
///
/// Any API error fails immediately; there is no retry budget here.
pub(crate) async fn wait_for_stopped<C, L>(
    ctx: &StepContext<C, L>,
    name: &str,
    instance: &InstanceRef,
    interval: Duration,
) -> Result<PollOutcome, WaitError>
where
    C: ComputeAdapter,
    L: StepLog,
{
    ctx.log(&format!("Waiting for instance {:?} to stop.", name));
    let mut ticker = ticker(interval);
    loop {
        if !next_tick(&mut ticker, &ctx.cancel).await {
            return Ok(PollOutcome::Cancelled);
        }
        let checked = ctx.compute.instance_stopped(instance).await;
        if ctx.cancel.is_cancelled() {
            return Ok(PollOutcome::Cancelled);
        }
        let stopped = checked.map_err(|e| {
            WaitError::api(name, format!("failed to check whether instance is stopped: {}", e))
        })?;
        if stopped {
            ctx.log(&format!("Instance {:?} stopped.", name));
            return Ok(PollOutcome::Signalled);
        }
        tracing::debug!(step = ctx.step(), instance = name, "instance not stopped yet");
    }
}

#[cfg(test)]
#[path = "stopped_tests.rs"]
mod tests;
