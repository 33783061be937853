// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow-wide store of values extracted from serial console output.

use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Key/value pairs published by serial-output pollers.
///
/// Created once per root workflow and handed to every nested workflow and
/// step by cloning the handle; all clones share one map. Writes are
/// insert-or-overwrite, so publishing the same pair twice is harmless.
#[derive(Clone, Default)]
pub struct OutputStore {
    inner: Arc<Mutex<IndexMap<String, String>>>,
}

impl OutputStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`.
    pub fn upsert(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        tracing::debug!(%key, %value, "serial output value recorded");
        self.inner.lock().insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of all pairs in first-insertion order.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.inner.lock().iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// True if both handles point at the same underlying store.
    pub fn shares_with(&self, other: &OutputStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for OutputStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.inner.lock().iter()).finish()
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
