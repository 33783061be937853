// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parse wait step documents from JSON, TOML, or HCL.
//!
//! A document holds exactly one step key:
//!
//! ```json
//! {"WaitForInstancesSignal": [{"Name": "i1", "Stopped": true}]}
//! ```
//!
//! ```toml
//! [[WaitForAnyInstancesSignal]]
//! Name = "i1"
//! Stopped = true
//! ```
//!
//! ```hcl
//! WaitForInstancesSignal {
//!   Name    = "i1"
//!   Stopped = true
//! }
//! ```

use crate::signal::InstanceSignalDef;
use crate::step::{WaitMode, WaitStepDef};
use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use thiserror::Error;

/// Document syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Hcl,
}

impl Format {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Format> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            "hcl" => Some(Format::Hcl),
            _ => None,
        }
    }
}

/// Errors from parsing or validating a wait step
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("hcl parse error: {0}")]
    Hcl(#[from] hcl::Error),
    #[error("{location}: {message}")]
    InvalidFormat { location: String, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize)]
struct StepDocument {
    #[serde(rename = "WaitForInstancesSignal", default, deserialize_with = "one_or_many")]
    wait_all: Option<Vec<InstanceSignalDef>>,
    #[serde(rename = "WaitForAnyInstancesSignal", default, deserialize_with = "one_or_many")]
    wait_any: Option<Vec<InstanceSignalDef>>,
}

/// A single block and a list of blocks both become a list.
///
/// Visits the value directly instead of going through an untagged enum so a
/// bad field inside a block keeps its own error.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<InstanceSignalDef>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OneOrMany;

    impl<'de> Visitor<'de> for OneOrMany {
        type Value = Vec<InstanceSignalDef>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an instance signal block or a list of them")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut defs = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(def) = seq.next_element()? {
                defs.push(def);
            }
            Ok(defs)
        }

        fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let def = InstanceSignalDef::deserialize(MapAccessDeserializer::new(map))?;
            Ok(vec![def])
        }
    }

    deserializer.deserialize_any(OneOrMany).map(Some)
}

/// Parse a JSON step document
pub fn parse_step(content: &str) -> Result<WaitStepDef, ParseError> {
    parse_step_with_format(content, Format::Json)
}

pub fn parse_step_with_format(content: &str, format: Format) -> Result<WaitStepDef, ParseError> {
    let doc: StepDocument = match format {
        Format::Json => serde_json::from_str(content)?,
        Format::Toml => toml::from_str(content)?,
        Format::Hcl => hcl::from_str(content)?,
    };

    let step = match (doc.wait_all, doc.wait_any) {
        (Some(signals), None) => WaitStepDef::new(WaitMode::All, signals),
        (None, Some(signals)) => WaitStepDef::new(WaitMode::Any, signals),
        (Some(_), Some(_)) => {
            return Err(ParseError::InvalidFormat {
                location: "step".to_string(),
                message: "WaitForInstancesSignal and WaitForAnyInstancesSignal are exclusive"
                    .to_string(),
            })
        }
        (None, None) => {
            return Err(ParseError::InvalidFormat {
                location: "step".to_string(),
                message: "expected WaitForInstancesSignal or WaitForAnyInstancesSignal"
                    .to_string(),
            })
        }
    };

    tracing::debug!(mode = %step.mode, instances = step.signals.len(), "parsed wait step");
    Ok(step)
}

/// Read and parse a step file, choosing the format from its extension
/// (JSON when the extension is unknown).
pub fn load_step(path: &Path) -> Result<WaitStepDef, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_step_with_format(&content, Format::from_path(path).unwrap_or(Format::Json))
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
