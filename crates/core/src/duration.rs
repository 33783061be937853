// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duration strings in the workflow file syntax (`300ms`, `10s`, `1m30s`).

use std::time::Duration;

/// Parse a duration string made of one or more `<number><unit>` terms.
///
/// Units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. Numbers may carry a decimal
/// fraction (`1.5s`). A bare `0` is accepted; any other number needs a unit.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }
    if s.starts_with('-') {
        return Err(format!("negative duration: {}", s));
    }
    let body = s.strip_prefix('+').unwrap_or(s);
    if body == "0" {
        return Ok(Duration::ZERO);
    }

    let out_of_range = || format!("duration out of range: {}", s);
    let mut total: u64 = 0;
    let mut rest = body;
    while !rest.is_empty() {
        let (whole, whole_len) = leading_int(rest).ok_or_else(out_of_range)?;
        rest = &rest[whole_len..];
        let mut fraction = (0u64, 1u64);
        let mut fraction_len = 0;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (f, len) = leading_fraction(after_dot);
            fraction = f;
            fraction_len = len;
            rest = &after_dot[len..];
        }
        if whole_len == 0 && fraction_len == 0 {
            return Err(format!("invalid number in duration: {}", s));
        }

        let unit_end =
            rest.find(|c: char| c.is_ascii_digit() || c == '.').unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];

        let nanos_per_unit: u64 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3600 * 1_000_000_000,
            "" => return Err(format!("missing unit in duration: {}", s)),
            other => return Err(format!("unknown duration unit: {}", other)),
        };

        let (numerator, scale) = fraction;
        let fraction_nanos = u128::from(numerator) * u128::from(nanos_per_unit) / u128::from(scale);
        let term = u128::from(whole) * u128::from(nanos_per_unit) + fraction_nanos;
        total = u64::try_from(term)
            .ok()
            .and_then(|term| total.checked_add(term))
            .filter(|&t| t <= MAX_NANOS)
            .ok_or_else(out_of_range)?;
    }

    Ok(Duration::from_nanos(total))
}

/// Durations are signed 64-bit nanosecond counts in the workflow syntax.
const MAX_NANOS: u64 = i64::MAX as u64;

/// Leading decimal digits as an integer and their byte length. `None` on overflow.
fn leading_int(s: &str) -> Option<(u64, usize)> {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    let mut value: u64 = 0;
    for b in s[..len].bytes() {
        value = value.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
    }
    Some((value, len))
}

/// Leading fraction digits as `(numerator, scale)` plus their byte length.
/// Digits past what fits are dropped, which only loses sub-nanosecond precision.
fn leading_fraction(s: &str) -> ((u64, u64), usize) {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    let (mut numerator, mut scale) = (0u64, 1u64);
    for b in s[..len].bytes() {
        let next = scale.checked_mul(10).and_then(|sc| {
            numerator.checked_mul(10)?.checked_add(u64::from(b - b'0')).map(|n| (n, sc))
        });
        match next {
            Some((n, sc)) => {
                numerator = n;
                scale = sc;
            }
            None => break,
        }
    }
    ((numerator, scale), len)
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
