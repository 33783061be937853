// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compute API surface used by the instance signal pollers.

use async_trait::async_trait;
use ib_core::{InstanceRef, InstanceStatus};
use thiserror::Error;

/// Errors from compute API calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputeError {
    /// The resource or key does not exist (HTTP 404)
    #[error("not found: {0}")]
    NotFound(String),
    #[error("api error: {0}")]
    Api(String),
}

impl ComputeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// One page of serial console output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortOutput {
    pub contents: String,
    /// Offset to pass as `start` on the next request
    pub next: i64,
}

/// Adapter for the compute provider's instance API.
///
/// Implementations must be safe to call from many poller tasks at once.
#[async_trait]
pub trait ComputeAdapter: Clone + Send + Sync + 'static {
    /// Whether the instance has reached a stopped power state
    async fn instance_stopped(&self, instance: &InstanceRef) -> Result<bool, ComputeError>;

    /// Read serial port `port` starting at byte offset `start`
    async fn serial_port_output(
        &self,
        instance: &InstanceRef,
        port: i64,
        start: i64,
    ) -> Result<SerialPortOutput, ComputeError>;

    /// Current lifecycle status of the instance
    async fn instance_status(&self, instance: &InstanceRef) -> Result<InstanceStatus, ComputeError>;

    /// Read a single guest attribute. A key that has not been written yet is
    /// reported as [`ComputeError::NotFound`].
    async fn guest_attribute(
        &self,
        instance: &InstanceRef,
        query_path: &str,
        variable_key: &str,
    ) -> Result<String, ComputeError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ComputeAdapter, ComputeError, SerialPortOutput};
    use async_trait::async_trait;
    use ib_core::{InstanceRef, InstanceStatus};
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Recorded compute call
    #[derive(Debug, Clone)]
    pub enum ComputeCall {
        InstanceStopped { instance: String, at: Instant },
        SerialPortOutput { instance: String, port: i64, start: i64, at: Instant },
        InstanceStatus { instance: String, at: Instant },
        GuestAttribute { instance: String, query_path: String, variable_key: String, at: Instant },
    }

    impl ComputeCall {
        pub fn instance(&self) -> &str {
            match self {
                Self::InstanceStopped { instance, .. }
                | Self::SerialPortOutput { instance, .. }
                | Self::InstanceStatus { instance, .. }
                | Self::GuestAttribute { instance, .. } => instance,
            }
        }

        pub fn at(&self) -> Instant {
            match self {
                Self::InstanceStopped { at, .. }
                | Self::SerialPortOutput { at, .. }
                | Self::InstanceStatus { at, .. }
                | Self::GuestAttribute { at, .. } => *at,
            }
        }
    }

    /// Scripted responses for one instance. Each queue is consumed one entry
    /// per call; an empty queue falls back to a quiet default.
    struct FakeInstance {
        stopped: VecDeque<Result<bool, ComputeError>>,
        serial: VecDeque<Result<String, ComputeError>>,
        statuses: VecDeque<Result<InstanceStatus, ComputeError>>,
        status: InstanceStatus,
        guest: VecDeque<Result<String, ComputeError>>,
    }

    impl Default for FakeInstance {
        fn default() -> Self {
            Self {
                stopped: VecDeque::new(),
                serial: VecDeque::new(),
                statuses: VecDeque::new(),
                status: InstanceStatus::Running,
                guest: VecDeque::new(),
            }
        }
    }

    #[derive(Default)]
    struct FakeComputeState {
        instances: HashMap<String, FakeInstance>,
        calls: Vec<ComputeCall>,
        latency: Duration,
    }

    impl FakeComputeState {
        fn instance(&mut self, name: &str) -> &mut FakeInstance {
            self.instances.entry(name.to_string()).or_default()
        }
    }

    /// Fake compute adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeComputeAdapter {
        inner: Arc<Mutex<FakeComputeState>>,
    }

    impl FakeComputeAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a power-state answer (default when empty: not stopped)
        pub fn push_stopped(&self, instance: &str, result: Result<bool, ComputeError>) {
            self.inner.lock().instance(instance).stopped.push_back(result);
        }

        /// Queue a serial output chunk (default when empty: no new output)
        pub fn push_serial(&self, instance: &str, chunk: &str) {
            self.inner.lock().instance(instance).serial.push_back(Ok(chunk.to_string()));
        }

        pub fn push_serial_error(&self, instance: &str, err: ComputeError) {
            self.inner.lock().instance(instance).serial.push_back(Err(err));
        }

        /// Set the status reported once the scripted status queue is drained
        pub fn set_status(&self, instance: &str, status: InstanceStatus) {
            self.inner.lock().instance(instance).status = status;
        }

        pub fn push_status(&self, instance: &str, result: Result<InstanceStatus, ComputeError>) {
            self.inner.lock().instance(instance).statuses.push_back(result);
        }

        /// Queue a guest attribute answer (default when empty: not found)
        pub fn push_guest_attribute(&self, instance: &str, result: Result<String, ComputeError>) {
            self.inner.lock().instance(instance).guest.push_back(result);
        }

        /// Delay every answer by `latency`. The call is recorded when it
        /// starts, the scripted answer is returned when it ends.
        pub fn set_latency(&self, latency: Duration) {
            self.inner.lock().latency = latency;
        }

        /// Get all recorded calls
        pub fn calls(&self) -> Vec<ComputeCall> {
            self.inner.lock().calls.clone()
        }

        /// Recorded calls against one instance
        pub fn calls_for(&self, instance: &str) -> Vec<ComputeCall> {
            self.inner.lock().calls.iter().filter(|c| c.instance() == instance).cloned().collect()
        }
    }

    /// Answer after the configured latency, like a slow API round trip
    async fn respond<T>(result: T, latency: Duration) -> T {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        result
    }

    #[async_trait]
    impl ComputeAdapter for FakeComputeAdapter {
        async fn instance_stopped(&self, instance: &InstanceRef) -> Result<bool, ComputeError> {
            let (result, latency) = {
                let mut state = self.inner.lock();
                state.calls.push(ComputeCall::InstanceStopped {
                    instance: instance.name.to_string(),
                    at: Instant::now(),
                });
                let result =
                    state.instance(&instance.name).stopped.pop_front().unwrap_or(Ok(false));
                (result, state.latency)
            };
            respond(result, latency).await
        }

        async fn serial_port_output(
            &self,
            instance: &InstanceRef,
            port: i64,
            start: i64,
        ) -> Result<SerialPortOutput, ComputeError> {
            let (result, latency) = {
                let mut state = self.inner.lock();
                state.calls.push(ComputeCall::SerialPortOutput {
                    instance: instance.name.to_string(),
                    port,
                    start,
                    at: Instant::now(),
                });
                let result = match state.instance(&instance.name).serial.pop_front() {
                    Some(Ok(contents)) => {
                        let next = start + contents.len() as i64;
                        Ok(SerialPortOutput { contents, next })
                    }
                    Some(Err(e)) => Err(e),
                    None => Ok(SerialPortOutput { contents: String::new(), next: start }),
                };
                (result, state.latency)
            };
            respond(result, latency).await
        }

        async fn instance_status(
            &self,
            instance: &InstanceRef,
        ) -> Result<InstanceStatus, ComputeError> {
            let (result, latency) = {
                let mut state = self.inner.lock();
                state.calls.push(ComputeCall::InstanceStatus {
                    instance: instance.name.to_string(),
                    at: Instant::now(),
                });
                let fake = state.instance(&instance.name);
                let result = match fake.statuses.pop_front() {
                    Some(result) => result,
                    None => Ok(fake.status.clone()),
                };
                (result, state.latency)
            };
            respond(result, latency).await
        }

        async fn guest_attribute(
            &self,
            instance: &InstanceRef,
            query_path: &str,
            variable_key: &str,
        ) -> Result<String, ComputeError> {
            let (result, latency) = {
                let mut state = self.inner.lock();
                state.calls.push(ComputeCall::GuestAttribute {
                    instance: instance.name.to_string(),
                    query_path: query_path.to_string(),
                    variable_key: variable_key.to_string(),
                    at: Instant::now(),
                });
                let result = state
                    .instance(&instance.name)
                    .guest
                    .pop_front()
                    .unwrap_or_else(|| Err(ComputeError::NotFound(variable_key.to_string())));
                (result, state.latency)
            };
            respond(result, latency).await
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{ComputeCall, FakeComputeAdapter};

#[cfg(test)]
#[path = "compute_tests.rs"]
mod tests;
