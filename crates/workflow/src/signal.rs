// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw instance signal definitions as written in workflow files.
//!
//! ```json
//! {
//!   "Name": "builder",
//!   "Interval": "5s",
//!   "SerialOutput": {
//!     "Port": 1,
//!     "SuccessMatch": "BuildSuccess",
//!     "FailureMatch": ["BuildFailed", "Kernel panic"],
//!     "StatusMatch": "BuildStatus"
//!   }
//! }
//! ```
//!
//! Keys are PascalCase; lower camelCase spellings are accepted as aliases.

use serde::{Deserialize, Deserializer, Serialize};

/// Poll interval used when a signal does not set one
pub const DEFAULT_INTERVAL: &str = "10s";
pub const DEFAULT_GUEST_ATTRIBUTE_NAMESPACE: &str = "daisy";
pub const DEFAULT_GUEST_ATTRIBUTE_KEY: &str = "DaisyResult";

/// What to wait for on one instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceSignalDef {
    /// Instance name, as declared elsewhere in the workflow
    #[serde(alias = "name")]
    pub name: String,
    /// Poll interval in duration syntax (`5s`, `500ms`)
    #[serde(default, alias = "interval", skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    /// Wait for the instance to stop
    #[serde(default, alias = "stopped")]
    pub stopped: bool,
    /// Wait for a line match in serial console output
    #[serde(default, alias = "serialOutput", skip_serializing_if = "Option::is_none")]
    pub serial_output: Option<SerialOutputDef>,
    /// Wait for a guest attribute key (and optionally value)
    #[serde(default, alias = "guestAttribute", skip_serializing_if = "Option::is_none")]
    pub guest_attribute: Option<GuestAttributeDef>,
}

impl InstanceSignalDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    ib_core::setters! {
        set { stopped: bool }
        option {
            interval: String,
            serial_output: SerialOutputDef,
            guest_attribute: GuestAttributeDef,
        }
    }
}

/// Serial console match configuration.
///
/// A status match logs the matching line and publishes any
/// `<serial-output key:'K' value:'V'>` token on it. The signal resolves when a
/// line matches `SuccessMatch` or one of `FailureMatch`; the latter fails the
/// step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SerialOutputDef {
    #[serde(default, alias = "port")]
    pub port: i64,
    #[serde(default, alias = "successMatch", skip_serializing_if = "String::is_empty")]
    pub success_match: String,
    #[serde(default, alias = "failureMatch", skip_serializing_if = "FailureMatches::is_empty")]
    pub failure_match: FailureMatches,
    #[serde(default, alias = "statusMatch", skip_serializing_if = "String::is_empty")]
    pub status_match: String,
}

impl SerialOutputDef {
    pub fn new(port: i64) -> Self {
        Self { port, ..Default::default() }
    }

    ib_core::setters! {
        into {
            success_match: String,
            failure_match: FailureMatches,
            status_match: String,
        }
    }
}

/// Guest attribute match configuration.
///
/// Without `SuccessValue`, the presence of the key is enough. With it, any
/// other value fails the step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GuestAttributeDef {
    #[serde(default, alias = "namespace", skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, alias = "keyName", skip_serializing_if = "String::is_empty")]
    pub key_name: String,
    #[serde(default, alias = "successValue", skip_serializing_if = "String::is_empty")]
    pub success_value: String,
}

impl GuestAttributeDef {
    pub fn new() -> Self {
        Self::default()
    }

    ib_core::setters! {
        into {
            namespace: String,
            key_name: String,
            success_value: String,
        }
    }
}

/// Failure patterns, written either as one string or a list.
///
/// ```json
/// "FailureMatch": "BuildFailed"
/// "FailureMatch": ["BuildFailed", "Kernel panic"]
/// ```
///
/// Both forms deserialize to an ordered list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FailureMatches(pub Vec<String>);

impl FailureMatches {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for FailureMatches {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            One(String),
            Many(Vec<String>),
        }

        match Helper::deserialize(deserializer)? {
            Helper::One(s) => Ok(FailureMatches(vec![s])),
            Helper::Many(v) => Ok(FailureMatches(v)),
        }
    }
}

impl From<&str> for FailureMatches {
    fn from(s: &str) -> Self {
        FailureMatches(vec![s.to_string()])
    }
}

impl From<String> for FailureMatches {
    fn from(s: String) -> Self {
        FailureMatches(vec![s])
    }
}

impl From<Vec<String>> for FailureMatches {
    fn from(v: Vec<String>) -> Self {
        FailureMatches(v)
    }
}

impl<const N: usize> From<[&str; N]> for FailureMatches {
    fn from(v: [&str; N]) -> Self {
        FailureMatches(v.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
