// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run one signal race per instance and combine the results.

use crate::context::StepContext;
use crate::error::WaitError;
use crate::poller::PollOutcome;
use crate::race::SignalRace;
use crate::registry::InstanceRegistry;
use ib_adapters::{ComputeAdapter, StepLog};
use ib_workflow::{SignalSpec, WaitMode};
use tokio::task::JoinSet;

/// Combines per-instance races into a step result.
///
/// - wait-for-all: succeeds once every race has succeeded
/// - wait-for-any: succeeds on the first race to succeed
///
/// In both modes the first error fails the step. Workflow cancellation
/// resolves the wait with `Ok(())` at any point.
pub struct WaitOrchestrator<C, L> {
    ctx: StepContext<C, L>,
    mode: WaitMode,
}

impl<C, L> WaitOrchestrator<C, L>
where
    C: ComputeAdapter,
    L: StepLog,
{
    pub fn new(ctx: StepContext<C, L>, mode: WaitMode) -> Self {
        Self { ctx, mode }
    }

    pub async fn run<R>(&self, registry: &R, specs: &[SignalSpec]) -> Result<(), WaitError>
    where
        R: InstanceRegistry + ?Sized,
    {
        tracing::info!(
            step = self.ctx.step(),
            mode = %self.mode,
            instances = specs.len(),
            "waiting for instance signals"
        );

        let group = self.ctx.cancel.child_token();
        let mut races = JoinSet::new();
        for spec in specs {
            let name = spec.name().to_string();
            match registry.resolve(&name) {
                Some(instance) => {
                    let ctx = self.ctx.with_cancel(group.clone());
                    let race = SignalRace::new(ctx, instance, spec.clone());
                    races.spawn(async move { (name, race.run().await) });
                }
                None => {
                    let err = WaitError::Config(format!("unresolved instance {:?}", name));
                    races.spawn(async move { (name, Err(err)) });
                }
            }
        }

        let result = loop {
            tokio::select! {
                biased;
                _ = self.ctx.cancel.cancelled() => {
                    tracing::info!(step = self.ctx.step(), "wait cancelled");
                    break Ok(());
                }
                next = races.join_next() => match next {
                    None => break Ok(()),
                    Some(Err(e)) => break Err(WaitError::from(e)),
                    Some(Ok((name, Err(e)))) => {
                        tracing::warn!(
                            step = self.ctx.step(),
                            instance = %name,
                            error = %e,
                            "instance signal failed"
                        );
                        break Err(e);
                    }
                    Some(Ok((_, Ok(PollOutcome::Cancelled)))) => break Ok(()),
                    Some(Ok((name, Ok(PollOutcome::Signalled)))) => {
                        tracing::debug!(
                            step = self.ctx.step(),
                            instance = %name,
                            remaining = races.len(),
                            "instance signalled"
                        );
                        if self.mode == WaitMode::Any {
                            break Ok(());
                        }
                    }
                },
            }
        };

        group.cancel();
        races.detach_all();
        result
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
