// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors that end a wait step.

use crate::registry::RegistryError;
use ib_workflow::ParseError;
use thiserror::Error;

/// Why a wait step failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError {
    /// Rejected before any polling: bad step definition or unknown instance
    #[error("config error: {0}")]
    Config(String),
    /// The compute API kept failing past the error budget
    #[error("instance {instance:?}: {message}")]
    Api { instance: String, message: String },
    /// The instance reported failure (failure pattern or wrong attribute value)
    #[error("instance {instance:?}: {message}")]
    SignalFailure { instance: String, message: String },
    /// A poller task panicked or was aborted
    #[error("poller task failed: {0}")]
    Task(String),
}

impl WaitError {
    /// Instance the error is attributed to, if any
    pub fn instance(&self) -> Option<&str> {
        match self {
            Self::Api { instance, .. } | Self::SignalFailure { instance, .. } => Some(instance),
            Self::Config(_) | Self::Task(_) => None,
        }
    }

    pub(crate) fn api(instance: &str, message: impl Into<String>) -> Self {
        Self::Api { instance: instance.to_string(), message: message.into() }
    }

    pub(crate) fn signal_failure(instance: &str, message: impl Into<String>) -> Self {
        Self::SignalFailure { instance: instance.to_string(), message: message.into() }
    }
}

impl From<ParseError> for WaitError {
    fn from(e: ParseError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<RegistryError> for WaitError {
    fn from(e: RegistryError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<tokio::task::JoinError> for WaitError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Task(e.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
