// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wait-for-instance-signal step definitions.

use crate::parser::ParseError;
use crate::signal::InstanceSignalDef;
use crate::spec::SignalSpec;
use serde::{Deserialize, Serialize};

/// How results from several instances combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitMode {
    /// Every instance must signal success (`WaitForInstancesSignal`)
    All,
    /// The first instance to signal success completes the step
    /// (`WaitForAnyInstancesSignal`)
    Any,
}

ib_core::simple_display! {
    WaitMode {
        All => "wait-for-all",
        Any => "wait-for-any",
    }
}

impl WaitMode {
    /// Step type name used as the document key
    pub fn step_type(self) -> &'static str {
        match self {
            WaitMode::All => "WaitForInstancesSignal",
            WaitMode::Any => "WaitForAnyInstancesSignal",
        }
    }
}

/// A parsed wait step: its mode and one signal definition per instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitStepDef {
    pub mode: WaitMode,
    pub signals: Vec<InstanceSignalDef>,
}

impl WaitStepDef {
    pub fn new(mode: WaitMode, signals: Vec<InstanceSignalDef>) -> Self {
        Self { mode, signals }
    }

    /// Apply defaults and validate every signal.
    ///
    /// Stops at the first invalid signal; the error location names the step
    /// type, index, and instance (`WaitForInstancesSignal[1](i2).Interval`).
    pub fn populate(&self) -> Result<Vec<SignalSpec>, ParseError> {
        if self.signals.is_empty() {
            return Err(ParseError::InvalidFormat {
                location: self.mode.step_type().to_string(),
                message: "no instances to wait for".to_string(),
            });
        }
        self.signals
            .iter()
            .enumerate()
            .map(|(i, def)| {
                let location = format!("{}[{}]({})", self.mode.step_type(), i, def.name);
                SignalSpec::from_def(def, &location)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
