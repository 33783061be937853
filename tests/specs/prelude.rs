// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for wait step specs.

pub use ib_adapters::{ComputeError, FakeComputeAdapter, FakeStepLog};
pub use ib_core::{InstanceRef, InstanceStatus, OutputStore};
pub use ib_engine::{InMemoryInstanceRegistry, StepContext, WaitError, WaitStep};
pub use ib_workflow::{parse_step, parse_step_with_format, Format, WaitMode};
pub use std::time::Duration;
pub use tokio::time::Instant;
pub use tokio_util::sync::CancellationToken;

/// Set `RUST_LOG=debug` to see engine logs while a spec runs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A root workflow with fakes and a handful of declared instances.
pub struct World {
    pub compute: FakeComputeAdapter,
    pub log: FakeStepLog,
    pub outputs: OutputStore,
    pub cancel: CancellationToken,
    pub registry: InMemoryInstanceRegistry,
}

impl World {
    pub fn new(instances: &[&str]) -> Self {
        init_tracing();
        let registry = InMemoryInstanceRegistry::new();
        for name in instances {
            registry.declare(*name, InstanceRef::new("spec-project", "us-west1-b", *name));
        }
        Self {
            compute: FakeComputeAdapter::new(),
            log: FakeStepLog::new(),
            outputs: OutputStore::new(),
            cancel: CancellationToken::new(),
            registry,
        }
    }

    /// Context for a step of the root workflow
    pub fn ctx(&self, step: &str) -> StepContext<FakeComputeAdapter, FakeStepLog> {
        StepContext::new(
            step,
            self.compute.clone(),
            self.log.clone(),
            self.outputs.clone(),
            self.cancel.clone(),
        )
    }

    /// Parse, populate, validate and run a JSON step document.
    pub async fn run_json(&self, step: &str, json: &str) -> Result<(), WaitError> {
        self.run_step(&self.ctx(step), json).await
    }

    pub async fn run_step(
        &self,
        ctx: &StepContext<FakeComputeAdapter, FakeStepLog>,
        json: &str,
    ) -> Result<(), WaitError> {
        let def = parse_step(json)?;
        let step = WaitStep::populate(&def)?;
        step.validate(&self.registry, ctx.step())?;
        step.run(ctx, &self.registry).await
    }

    /// Script serial output `chunks` for `instance`, one per poll
    pub fn serial(&self, instance: &str, chunks: &[&str]) {
        for chunk in chunks {
            self.compute.push_serial(instance, chunk);
        }
    }
}
