// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wait for a pattern in serial console output.

use super::scan::{ScanEvent, SerialScanner};
use super::{diagnose, next_tick, ticker, ErrorBudget, PollOutcome};
use crate::context::StepContext;
use crate::error::WaitError;
use crate::extract::publish_output_value;
use ib_adapters::{ComputeAdapter, StepLog};
use ib_core::InstanceRef;
use ib_workflow::SerialOutputMatcher;
use std::time::Duration;

/// Poll serial port output until a success or failure pattern shows up.
///
/// Fetch errors are retried up to the error budget, except while the
/// instance is powering down, when the tick is skipped without penalty.
pub(crate) async fn wait_for_serial_output<C, L>(
    ctx: &StepContext<C, L>,
    name: &str,
    instance: &InstanceRef,
    matcher: &SerialOutputMatcher,
    interval: Duration,
) -> Result<PollOutcome, WaitError>
where
    C: ComputeAdapter,
    L: StepLog,
{
    announce(ctx, name, matcher);

    let mut scanner = SerialScanner::new(matcher.clone());
    let mut budget = ErrorBudget::default();
    let mut ticker = ticker(interval);
    loop {
        if !next_tick(&mut ticker, &ctx.cancel).await {
            return Ok(PollOutcome::Cancelled);
        }

        let start = scanner.cursor().next_offset;
        let fetched = ctx.compute.serial_port_output(instance, matcher.port, start).await;
        if ctx.cancel.is_cancelled() {
            return Ok(PollOutcome::Cancelled);
        }
        let output = match fetched {
            Ok(output) => output,
            Err(e) => {
                let diag = diagnose(&ctx.compute, instance, &e).await;
                if ctx.cancel.is_cancelled() {
                    return Ok(PollOutcome::Cancelled);
                }
                if diag.powered_down {
                    tracing::debug!(
                        step = ctx.step(),
                        instance = name,
                        error = %diag.detail,
                        "serial port unavailable while instance powers down"
                    );
                    continue;
                }
                if budget.charge() {
                    return Err(WaitError::api(
                        name,
                        format!("error getting serial port: {}", diag.detail),
                    ));
                }
                tracing::warn!(
                    step = ctx.step(),
                    instance = name,
                    errors = budget.consecutive(),
                    error = %diag.detail,
                    "serial port fetch failed, retrying"
                );
                continue;
            }
        };
        budget.reset();

        for event in scanner.feed(&output.contents, output.next) {
            match event {
                ScanEvent::Status { text, line } => {
                    ctx.log(&format!("Instance {:?}: StatusMatch found: {:?}", name, text));
                    publish_output_value(&ctx.outputs, &line);
                }
                ScanEvent::Failure(text) => {
                    return Err(WaitError::signal_failure(
                        name,
                        format!("FailureMatch found: {:?}", text),
                    ));
                }
                ScanEvent::Success(text) => {
                    ctx.log(&format!("Instance {:?}: SuccessMatch found {:?}", name, text));
                    return Ok(PollOutcome::Signalled);
                }
            }
        }
    }
}

fn announce<C, L>(ctx: &StepContext<C, L>, name: &str, matcher: &SerialOutputMatcher)
where
    C: ComputeAdapter,
    L: StepLog,
{
    let mut watching = Vec::new();
    if let Some(p) = &matcher.success_match {
        watching.push(format!("SuccessMatch: {:?}", p));
    }
    if !matcher.failure_matches.is_empty() {
        watching.push(format!("FailureMatch: {:?}", matcher.failure_matches));
    }
    if let Some(p) = &matcher.status_match {
        watching.push(format!("StatusMatch: {:?}", p));
    }
    ctx.log(&format!(
        "Instance {:?}: watching serial port {}, {}.",
        name,
        matcher.port,
        watching.join(", ")
    ));
}

#[cfg(test)]
#[path = "serial_tests.rs"]
mod tests;
