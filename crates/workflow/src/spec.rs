// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validated, immutable signal specifications.

use crate::parser::ParseError;
use crate::signal::{
    InstanceSignalDef, DEFAULT_GUEST_ATTRIBUTE_KEY, DEFAULT_GUEST_ATTRIBUTE_NAMESPACE,
    DEFAULT_INTERVAL,
};
use ib_core::parse_duration;
use std::time::Duration;

/// One of the independent ways an instance can prove completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalSource {
    Stopped,
    SerialOutput,
    GuestAttribute,
}

ib_core::simple_display! {
    SignalSource {
        Stopped => "stopped",
        SerialOutput => "serial-output",
        GuestAttribute => "guest-attribute",
    }
}

/// Serial console matcher with empty patterns normalized away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialOutputMatcher {
    pub port: i64,
    pub success_match: Option<String>,
    pub failure_matches: Vec<String>,
    pub status_match: Option<String>,
}

/// Guest attribute matcher with namespace and key defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestAttributeMatcher {
    pub namespace: String,
    pub key_name: String,
    pub success_value: Option<String>,
}

impl GuestAttributeMatcher {
    /// `namespace/key`, the variable key passed to the compute API
    pub fn variable_key(&self) -> String {
        format!("{}/{}", self.namespace, self.key_name)
    }
}

/// What to wait for on one instance, after defaults and validation.
///
/// At least one source is present and the interval is non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSpec {
    name: String,
    interval: Duration,
    stopped: bool,
    serial_output: Option<SerialOutputMatcher>,
    guest_attribute: Option<GuestAttributeMatcher>,
}

impl SignalSpec {
    /// Apply defaults to `def` and validate it.
    ///
    /// `location` prefixes error messages (e.g. `WaitForInstancesSignal[0](i1)`).
    pub fn from_def(def: &InstanceSignalDef, location: &str) -> Result<Self, ParseError> {
        let invalid = |field: &str, message: String| ParseError::InvalidFormat {
            location: if field.is_empty() {
                location.to_string()
            } else {
                format!("{}.{}", location, field)
            },
            message,
        };

        if def.name.trim().is_empty() {
            return Err(invalid("Name", "missing instance name".to_string()));
        }

        let raw_interval = def.interval.as_deref().unwrap_or(DEFAULT_INTERVAL);
        let interval = parse_duration(raw_interval).map_err(|e| {
            invalid("Interval", format!("failed to parse duration '{}': {}", raw_interval, e))
        })?;
        if interval.is_zero() {
            return Err(invalid(
                "Interval",
                format!("{:?}: cannot wait for instance signal, no interval given", def.name),
            ));
        }

        if !def.stopped && def.serial_output.is_none() && def.guest_attribute.is_none() {
            return Err(invalid(
                "",
                format!("{:?}: cannot wait for instance signal, nothing to wait for", def.name),
            ));
        }

        let serial_output = match &def.serial_output {
            Some(so) => {
                if so.port <= 0 {
                    return Err(invalid(
                        "SerialOutput.Port",
                        format!(
                            "{:?}: cannot wait for instance signal via SerialOutput, no Port given",
                            def.name
                        ),
                    ));
                }
                if so.success_match.is_empty() && so.failure_match.is_empty() {
                    return Err(invalid(
                        "SerialOutput",
                        format!(
                            "{:?}: cannot wait for instance signal via SerialOutput, \
                             no SuccessMatch or FailureMatch given",
                            def.name
                        ),
                    ));
                }
                Some(SerialOutputMatcher {
                    port: so.port,
                    success_match: non_empty(&so.success_match),
                    failure_matches: so.failure_match.0.clone(),
                    status_match: non_empty(&so.status_match),
                })
            }
            None => None,
        };

        let guest_attribute = def.guest_attribute.as_ref().map(|ga| GuestAttributeMatcher {
            namespace: non_empty(&ga.namespace)
                .unwrap_or_else(|| DEFAULT_GUEST_ATTRIBUTE_NAMESPACE.to_string()),
            key_name: non_empty(&ga.key_name)
                .unwrap_or_else(|| DEFAULT_GUEST_ATTRIBUTE_KEY.to_string()),
            success_value: non_empty(&ga.success_value),
        });

        Ok(Self { name: def.name.clone(), interval, stopped: def.stopped, serial_output, guest_attribute })
    }

    /// Instance name as written in the step
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn stopped(&self) -> bool {
        self.stopped
    }

    pub fn serial_output(&self) -> Option<&SerialOutputMatcher> {
        self.serial_output.as_ref()
    }

    pub fn guest_attribute(&self) -> Option<&GuestAttributeMatcher> {
        self.guest_attribute.as_ref()
    }

    /// Sources this spec races, in declaration order
    pub fn sources(&self) -> Vec<SignalSource> {
        let mut sources = Vec::with_capacity(3);
        if self.stopped {
            sources.push(SignalSource::Stopped);
        }
        if self.serial_output.is_some() {
            sources.push(SignalSource::SerialOutput);
        }
        if self.guest_attribute.is_some() {
            sources.push(SignalSource::GuestAttribute);
        }
        sources
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
