// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compute instance references and power states.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Fully-resolved reference to a compute instance.
///
/// Produced by the engine's instance registry from the short name used in a
/// workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceRef {
    pub project: SmolStr,
    pub zone: SmolStr,
    pub name: SmolStr,
}

impl InstanceRef {
    pub fn new(
        project: impl Into<SmolStr>,
        zone: impl Into<SmolStr>,
        name: impl Into<SmolStr>,
    ) -> Self {
        Self { project: project.into(), zone: zone.into(), name: name.into() }
    }
}

impl fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/zones/{}/instances/{}", self.project, self.zone, self.name)
    }
}

/// Lifecycle status reported by the compute provider for an instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstanceStatus {
    Provisioning,
    Staging,
    Running,
    Stopping,
    Stopped,
    Suspending,
    Suspended,
    Repairing,
    Terminated,
    /// Status string this engine does not model, kept verbatim.
    Other(String),
}

impl InstanceStatus {
    /// Parse a provider status string. Unknown values map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "PROVISIONING" => Self::Provisioning,
            "STAGING" => Self::Staging,
            "RUNNING" => Self::Running,
            "STOPPING" => Self::Stopping,
            "STOPPED" => Self::Stopped,
            "SUSPENDING" => Self::Suspending,
            "SUSPENDED" => Self::Suspended,
            "REPAIRING" => Self::Repairing,
            "TERMINATED" => Self::Terminated,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Provisioning => "PROVISIONING",
            Self::Staging => "STAGING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::Suspending => "SUSPENDING",
            Self::Suspended => "SUSPENDED",
            Self::Repairing => "REPAIRING",
            Self::Terminated => "TERMINATED",
            Self::Other(s) => s,
        }
    }

    /// True while the instance is shutting down or off.
    ///
    /// Serial output and guest attributes are unavailable in these states, so
    /// pollers wait for a restart instead of counting fetch failures.
    pub fn is_powered_down(&self) -> bool {
        matches!(self, Self::Stopping | Self::Stopped | Self::Terminated)
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for InstanceStatus {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
