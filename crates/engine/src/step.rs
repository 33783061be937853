// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wait step lifecycle: populate, validate, run.

use crate::context::StepContext;
use crate::error::WaitError;
use crate::registry::InstanceRegistry;
use crate::wait::WaitOrchestrator;
use ib_adapters::{ComputeAdapter, StepLog};
use ib_workflow::{SignalSpec, WaitMode, WaitStepDef};

/// A populated `WaitForInstancesSignal` or `WaitForAnyInstancesSignal` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitStep {
    mode: WaitMode,
    specs: Vec<SignalSpec>,
}

impl WaitStep {
    /// Apply defaults and check every signal definition.
    pub fn populate(def: &WaitStepDef) -> Result<Self, WaitError> {
        let specs = def.populate()?;
        Ok(Self { mode: def.mode, specs })
    }

    pub fn mode(&self) -> WaitMode {
        self.mode
    }

    pub fn specs(&self) -> &[SignalSpec] {
        &self.specs
    }

    /// Register every referenced instance as used by `step`.
    ///
    /// Fails on the first instance the registry rejects.
    pub fn validate<R>(&self, registry: &R, step: &str) -> Result<(), WaitError>
    where
        R: InstanceRegistry + ?Sized,
    {
        for (i, spec) in self.specs.iter().enumerate() {
            registry.register_use(spec.name(), step).map_err(|e| {
                WaitError::Config(format!(
                    "{}[{}]({}): {}",
                    self.mode.step_type(),
                    i,
                    spec.name(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Wait for the step's instances in the step's mode.
    pub async fn run<C, L, R>(&self, ctx: &StepContext<C, L>, registry: &R) -> Result<(), WaitError>
    where
        C: ComputeAdapter,
        L: StepLog,
        R: InstanceRegistry + ?Sized,
    {
        WaitOrchestrator::new(ctx.clone(), self.mode).run(registry, &self.specs).await
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
