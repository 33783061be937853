// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-step execution context handed to pollers.

use ib_adapters::{ComputeAdapter, StepLog};
use ib_core::OutputStore;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a running wait step needs from its workflow.
///
/// `outputs` and `cancel` belong to the root workflow; nested workflows get
/// clones of the same handles via [`StepContext::child_workflow`].
#[derive(Clone)]
pub struct StepContext<C, L> {
    step: Arc<str>,
    pub(crate) compute: C,
    pub(crate) log: L,
    pub(crate) outputs: OutputStore,
    pub(crate) cancel: CancellationToken,
}

impl<C, L> StepContext<C, L>
where
    C: ComputeAdapter,
    L: StepLog,
{
    pub fn new(
        step: impl Into<Arc<str>>,
        compute: C,
        log: L,
        outputs: OutputStore,
        cancel: CancellationToken,
    ) -> Self {
        Self { step: step.into(), compute, log, outputs, cancel }
    }

    /// Context for step `step` of a sub-workflow.
    ///
    /// Shares the output store and cancellation signal of this workflow.
    pub fn child_workflow(&self, step: impl Into<Arc<str>>) -> Self {
        Self {
            step: step.into(),
            compute: self.compute.clone(),
            log: self.log.clone(),
            outputs: self.outputs.clone(),
            cancel: self.cancel.clone(),
        }
    }

    pub fn step(&self) -> &str {
        &self.step
    }

    pub fn outputs(&self) -> &OutputStore {
        &self.outputs
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Same step, cancelled by `cancel` instead of the workflow token
    pub(crate) fn with_cancel(&self, cancel: CancellationToken) -> Self {
        Self { cancel, ..self.clone() }
    }

    pub(crate) fn log(&self, message: &str) {
        self.log.append(&self.step, message);
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
