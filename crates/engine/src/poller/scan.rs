// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line scanning over incrementally fetched serial output.
//!
//! Chunks may split lines anywhere. An unterminated final fragment is held
//! back and prefixed to the next chunk, so every line is scanned exactly once
//! and in full no matter how the stream was fragmented.

use ib_workflow::SerialOutputMatcher;

/// Read position in one serial port stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollCursor {
    /// Offset to request on the next fetch
    pub next_offset: i64,
    pending_tail: String,
}

impl PollCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unterminated fragment held over from earlier chunks
    pub fn pending_tail(&self) -> &str {
        &self.pending_tail
    }

    /// Split `chunk` into complete lines.
    ///
    /// The pending tail is prepended to the first line. If `chunk` does not end
    /// with `\n`, its last fragment becomes the new pending tail.
    pub fn take_lines(&mut self, chunk: &str) -> Vec<String> {
        let mut parts: Vec<&str> = chunk.split('\n').collect();
        let last = parts.pop().unwrap_or_default();

        let mut lines = Vec::with_capacity(parts.len());
        for (i, part) in parts.into_iter().enumerate() {
            if i == 0 {
                let mut line = std::mem::take(&mut self.pending_tail);
                line.push_str(part);
                lines.push(line);
            } else {
                lines.push(part.to_string());
            }
        }
        self.pending_tail.push_str(last);
        lines
    }
}

/// Something the scanner found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Status pattern matched
    Status {
        /// Trimmed line text from the match point
        text: String,
        /// Full line, for value extraction
        line: String,
    },
    /// A failure pattern matched; trimmed line text from the match point
    Failure(String),
    /// The success pattern matched; trimmed line text from the match point
    Success(String),
}

impl ScanEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Status { .. })
    }
}

/// Applies a [`SerialOutputMatcher`] to a fragmented stream.
#[derive(Debug, Clone)]
pub struct SerialScanner {
    matcher: SerialOutputMatcher,
    cursor: PollCursor,
}

impl SerialScanner {
    pub fn new(matcher: SerialOutputMatcher) -> Self {
        Self { matcher, cursor: PollCursor::new() }
    }

    pub fn cursor(&self) -> &PollCursor {
        &self.cursor
    }

    /// Feed one fetched chunk and move the cursor to `next_offset`.
    ///
    /// Lines are scanned in order. Per line: status first, then failure
    /// patterns in list order, then success. Scanning stops at the first
    /// terminal event, which is always last in the returned list.
    pub fn feed(&mut self, chunk: &str, next_offset: i64) -> Vec<ScanEvent> {
        self.cursor.next_offset = next_offset;
        let mut events = Vec::new();
        for line in self.cursor.take_lines(chunk) {
            let status = self.matcher.status_match.as_deref();
            if let Some(text) = status.and_then(|p| tail_from(&line, p)) {
                events.push(ScanEvent::Status { text, line: line.clone() });
            }
            let failures = &self.matcher.failure_matches;
            if let Some(text) = failures.iter().find_map(|p| tail_from(&line, p)) {
                events.push(ScanEvent::Failure(text));
                break;
            }
            let success = self.matcher.success_match.as_deref();
            if let Some(text) = success.and_then(|p| tail_from(&line, p)) {
                events.push(ScanEvent::Success(text));
                break;
            }
        }
        events
    }
}

/// Trimmed text of `line` starting at the first occurrence of `pattern`.
fn tail_from(line: &str, pattern: &str) -> Option<String> {
    line.find(pattern).map(|i| line[i..].trim().to_string())
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
