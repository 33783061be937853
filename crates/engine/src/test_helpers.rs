// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::context::StepContext;
use crate::registry::InMemoryInstanceRegistry;
use ib_adapters::{FakeComputeAdapter, FakeStepLog};
use ib_core::{InstanceRef, OutputStore};
use ib_workflow::{GuestAttributeMatcher, InstanceSignalDef, SerialOutputMatcher, SignalSpec};
use tokio_util::sync::CancellationToken;

pub(crate) type TestStepContext = StepContext<FakeComputeAdapter, FakeStepLog>;

/// Step context with fakes, plus handles to inspect them.
pub(crate) struct TestContext {
    pub ctx: TestStepContext,
    pub compute: FakeComputeAdapter,
    pub log: FakeStepLog,
    pub outputs: OutputStore,
    pub cancel: CancellationToken,
    pub registry: InMemoryInstanceRegistry,
}

/// Context for step `wait` with instances `i1`..`i3` declared.
pub(crate) fn setup() -> TestContext {
    let compute = FakeComputeAdapter::new();
    let log = FakeStepLog::new();
    let outputs = OutputStore::new();
    let cancel = CancellationToken::new();
    let ctx =
        StepContext::new("wait", compute.clone(), log.clone(), outputs.clone(), cancel.clone());
    let registry = InMemoryInstanceRegistry::new();
    for name in ["i1", "i2", "i3"] {
        registry.declare(name, instance(name));
    }
    TestContext { ctx, compute, log, outputs, cancel, registry }
}

pub(crate) fn instance(name: &str) -> InstanceRef {
    InstanceRef::new("test-project", "us-central1-a", name)
}

pub(crate) fn serial_matcher(success: &str, failures: &[&str], status: &str) -> SerialOutputMatcher {
    let non_empty = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };
    SerialOutputMatcher {
        port: 1,
        success_match: non_empty(success),
        failure_matches: failures.iter().map(|s| s.to_string()).collect(),
        status_match: non_empty(status),
    }
}

pub(crate) fn guest_matcher(success_value: Option<&str>) -> GuestAttributeMatcher {
    GuestAttributeMatcher {
        namespace: "daisy".to_string(),
        key_name: "DaisyResult".to_string(),
        success_value: success_value.map(str::to_string),
    }
}

/// Validated spec from a definition that is known to be valid
pub(crate) fn signal_spec(def: InstanceSignalDef) -> SignalSpec {
    SignalSpec::from_def(&def, "test").unwrap()
}
