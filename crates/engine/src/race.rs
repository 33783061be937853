// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Race an instance's signal sources against each other.

use crate::context::StepContext;
use crate::error::WaitError;
use crate::poller::{guest, serial, stopped, PollOutcome};
use ib_adapters::{ComputeAdapter, StepLog};
use ib_core::InstanceRef;
use ib_workflow::{SignalSource, SignalSpec};
use tokio::task::JoinSet;

/// One poller per configured source; the first terminal result decides.
///
/// Losers are cancelled, not aborted: an in-flight API call completes and its
/// result is discarded.
pub struct SignalRace<C, L> {
    ctx: StepContext<C, L>,
    instance: InstanceRef,
    spec: SignalSpec,
}

impl<C, L> SignalRace<C, L>
where
    C: ComputeAdapter,
    L: StepLog,
{
    pub fn new(ctx: StepContext<C, L>, instance: InstanceRef, spec: SignalSpec) -> Self {
        Self { ctx, instance, spec }
    }

    pub async fn run(self) -> Result<PollOutcome, WaitError> {
        let name = self.spec.name().to_string();
        let group = self.ctx.cancel.child_token();
        let mut pollers = JoinSet::new();

        for source in self.spec.sources() {
            tracing::debug!(step = self.ctx.step(), instance = %name, %source, "starting poller");
            let ctx = self.ctx.with_cancel(group.clone());
            let instance = self.instance.clone();
            let spec = self.spec.clone();
            pollers.spawn(async move {
                let outcome = poll_source(&ctx, &instance, &spec, source).await;
                (source, outcome)
            });
        }

        let first = pollers.join_next().await;
        group.cancel();
        pollers.detach_all();

        match first {
            Some(Ok((source, outcome))) => {
                tracing::info!(
                    step = self.ctx.step(),
                    instance = %name,
                    %source,
                    ?outcome,
                    "signal race resolved"
                );
                outcome
            }
            Some(Err(e)) => Err(WaitError::from(e)),
            None => Err(WaitError::Config(format!(
                "{:?}: cannot wait for instance signal, nothing to wait for",
                name
            ))),
        }
    }
}

async fn poll_source<C, L>(
    ctx: &StepContext<C, L>,
    instance: &InstanceRef,
    spec: &SignalSpec,
    source: SignalSource,
) -> Result<PollOutcome, WaitError>
where
    C: ComputeAdapter,
    L: StepLog,
{
    let name = spec.name();
    let interval = spec.interval();
    match (source, spec.serial_output(), spec.guest_attribute()) {
        (SignalSource::Stopped, _, _) => {
            stopped::wait_for_stopped(ctx, name, instance, interval).await
        }
        (SignalSource::SerialOutput, Some(matcher), _) => {
            serial::wait_for_serial_output(ctx, name, instance, matcher, interval).await
        }
        (SignalSource::GuestAttribute, _, Some(matcher)) => {
            guest::wait_for_guest_attribute(ctx, name, instance, matcher, interval).await
        }
        _ => Err(WaitError::Config(format!("{:?}: {} is not configured", name, source))),
    }
}

#[cfg(test)]
#[path = "race_tests.rs"]
mod tests;
