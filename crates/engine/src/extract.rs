// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured values embedded in serial console output.
//!
//! A guest publishes a value by printing a token on a status line:
//!
//! ```text
//! BuildStatus: <serial-output key:'image' value:'img-1234'>
//! ```

use ib_core::OutputStore;
use regex::Regex;
use std::sync::LazyLock;

// Greedy on purpose: the last token on a line wins.
#[allow(clippy::expect_used)]
static SERIAL_OUTPUT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r".*<serial-output key:'(.*)' value:'(.*)'>").expect("constant regex pattern is valid")
});

/// Pull a `(key, value)` pair out of a line, if it carries a token.
pub fn extract_output_value(line: &str) -> Option<(String, String)> {
    let caps = SERIAL_OUTPUT_VALUE.captures(line)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// Extract a token from `line` and upsert it into `store`.
///
/// Returns the published pair. Lines without a token leave the store as is.
pub fn publish_output_value(store: &OutputStore, line: &str) -> Option<(String, String)> {
    let (key, value) = extract_output_value(line)?;
    store.upsert(key.clone(), value.clone());
    Some((key, value))
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
