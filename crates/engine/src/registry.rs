// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instance registry seam.
//!
//! Wait steps refer to instances by the short name used in the workflow. The
//! registry resolves that name to a full [`InstanceRef`] and tracks which steps
//! use each instance.

use ib_core::InstanceRef;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("instance {0:?} is not declared in this workflow")]
    Undeclared(String),
    #[error("instance {name:?} was already deleted by step {step:?}")]
    Deleted { name: String, step: String },
}

/// Lookup and usage tracking for workflow instances.
///
/// Implementations are shared across concurrently running steps.
pub trait InstanceRegistry: Send + Sync + 'static {
    /// Resolve a workflow instance name
    fn resolve(&self, name: &str) -> Option<InstanceRef>;

    /// Record that `step` uses instance `name`.
    fn register_use(&self, name: &str, step: &str) -> Result<(), RegistryError>;
}

#[derive(Debug)]
struct Entry {
    instance: InstanceRef,
    users: Vec<String>,
    deleted_by: Option<String>,
}

/// Registry backed by an in-process map.
#[derive(Clone, Default)]
pub struct InMemoryInstanceRegistry {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
}

impl InMemoryInstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) an instance under its workflow name
    pub fn declare(&self, name: impl Into<String>, instance: InstanceRef) {
        let name = name.into();
        tracing::debug!(%name, %instance, "instance declared");
        self.inner.lock().insert(name, Entry { instance, users: Vec::new(), deleted_by: None });
    }

    /// Mark an instance as deleted by `step`. Later uses are rejected.
    pub fn mark_deleted(&self, name: &str, step: &str) -> Result<(), RegistryError> {
        let mut inner = self.inner.lock();
        let entry =
            inner.get_mut(name).ok_or_else(|| RegistryError::Undeclared(name.to_string()))?;
        entry.deleted_by = Some(step.to_string());
        Ok(())
    }

    /// Steps that registered a use of `name`, in registration order
    pub fn users(&self, name: &str) -> Vec<String> {
        self.inner.lock().get(name).map(|e| e.users.clone()).unwrap_or_default()
    }
}

impl InstanceRegistry for InMemoryInstanceRegistry {
    fn resolve(&self, name: &str) -> Option<InstanceRef> {
        self.inner.lock().get(name).map(|e| e.instance.clone())
    }

    fn register_use(&self, name: &str, step: &str) -> Result<(), RegistryError> {
        let mut inner = self.inner.lock();
        let entry =
            inner.get_mut(name).ok_or_else(|| RegistryError::Undeclared(name.to_string()))?;
        if let Some(deleter) = &entry.deleted_by {
            return Err(RegistryError::Deleted { name: name.to_string(), step: deleter.clone() });
        }
        if !entry.users.iter().any(|u| u == step) {
            entry.users.push(step.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
