// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wait for a guest attribute to be written.

use super::{diagnose, next_tick, ticker, ErrorBudget, PollOutcome};
use crate::context::StepContext;
use crate::error::WaitError;
use ib_adapters::{ComputeAdapter, StepLog};
use ib_core::InstanceRef;
use ib_workflow::GuestAttributeMatcher;
use std::time::Duration;

/// Guest attribute reads are rate limited; never poll faster than this.
pub const GUEST_ATTRIBUTE_MIN_INTERVAL: Duration = Duration::from_secs(6);

/// Poll interval actually used for a guest attribute signal
pub fn effective_interval(configured: Duration) -> Duration {
    configured.max(GUEST_ATTRIBUTE_MIN_INTERVAL)
}

/// Poll `namespace/key` until it exists.
///
/// A missing key (404) is expected while the guest boots and never counts
/// against the error budget. With a success value set, any other value is a
/// failure.
pub(crate) async fn wait_for_guest_attribute<C, L>(
    ctx: &StepContext<C, L>,
    name: &str,
    instance: &InstanceRef,
    matcher: &GuestAttributeMatcher,
    interval: Duration,
) -> Result<PollOutcome, WaitError>
where
    C: ComputeAdapter,
    L: StepLog,
{
    let variable_key = matcher.variable_key();
    match &matcher.success_value {
        Some(expected) => ctx.log(&format!(
            "Instance {:?}: watching for key {:?}, SuccessValue: {:?}.",
            name, variable_key, expected
        )),
        None => ctx.log(&format!("Instance {:?}: watching for key {:?}.", name, variable_key)),
    }

    let mut budget = ErrorBudget::default();
    let mut ticker = ticker(effective_interval(interval));
    loop {
        if !next_tick(&mut ticker, &ctx.cancel).await {
            return Ok(PollOutcome::Cancelled);
        }

        let fetched = ctx.compute.guest_attribute(instance, "", &variable_key).await;
        if ctx.cancel.is_cancelled() {
            return Ok(PollOutcome::Cancelled);
        }
        let value = match fetched {
            Ok(value) => value,
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    step = ctx.step(),
                    instance = name,
                    key = %variable_key,
                    "guest attribute not set yet"
                );
                continue;
            }
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
                        "guest attributes unavailable while instance powers down"
                    );
                    continue;
                }
                if budget.charge() {
                    return Err(WaitError::api(
                        name,
                        format!("error getting guest attribute: {}", diag.detail),
                    ));
                }
                tracing::warn!(
                    step = ctx.step(),
                    instance = name,
                    errors = budget.consecutive(),
                    error = %diag.detail,
                    "guest attribute fetch failed, retrying"
                );
                continue;
            }
        };

        return match &matcher.success_value {
            Some(expected) if value != *expected => Err(WaitError::signal_failure(
                name,
                format!("bad guest attribute value found: {:?}", value.trim()),
            )),
            Some(_) => {
                ctx.log(&format!(
                    "Instance {:?}: SuccessValue found for key {:?}.",
                    name, variable_key
                ));
                Ok(PollOutcome::Signalled)
            }
            None => {
                ctx.log(&format!("Instance {:?}: found key {:?}.", name, variable_key));
                Ok(PollOutcome::Signalled)
            }
        };
    }
}

#[cfg(test)]
#[path = "guest_tests.rs"]
mod tests;
