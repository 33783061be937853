// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step-scoped, operator-facing log sink.

/// Sink for human-readable step messages.
///
/// Messages are informational only; implementations must not fail the caller.
pub trait StepLog: Clone + Send + Sync + 'static {
    fn append(&self, step: &str, message: &str);
}

/// Forwards step messages to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingStepLog;

impl StepLog for TracingStepLog {
    fn append(&self, step: &str, message: &str) {
        tracing::info!(step, "{}", message);
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::StepLog;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded step log line
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct StepLogLine {
        pub step: String,
        pub message: String,
    }

    /// Fake step log for testing
    #[derive(Clone, Default)]
    pub struct FakeStepLog {
        lines: Arc<Mutex<Vec<StepLogLine>>>,
    }

    impl FakeStepLog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded lines
        pub fn lines(&self) -> Vec<StepLogLine> {
            self.lines.lock().clone()
        }

        /// True if any recorded message contains `needle`
        pub fn contains(&self, needle: &str) -> bool {
            self.lines.lock().iter().any(|l| l.message.contains(needle))
        }
    }

    impl StepLog for FakeStepLog {
        fn append(&self, step: &str, message: &str) {
            self.lines
                .lock()
                .push(StepLogLine { step: step.to_string(), message: message.to_string() });
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStepLog, StepLogLine};

#[cfg(test)]
#[path = "step_log_tests.rs"]
mod tests;
