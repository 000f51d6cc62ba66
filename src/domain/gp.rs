//! Parsing and formatting of gold-piece amounts.
//!
//! Accepts the shorthand players actually type: `125k`, `1.25m`, `2b` and
//! `1,250,000`.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GpParseError {
    #[error("invalid GP amount {input:?}; use 125k, 1.25m, 2b or 1,250,000")]
    InvalidFormat { input: String },
}

/// Parses a magnitude-suffixed decimal into whole gold pieces.
///
/// Fractions are rounded to the nearest coin, halves away from zero.
/// Negative amounts parse fine; callers that need non-negative values reject
/// them themselves.
pub fn parse_gp(input: &str) -> Result<i64, GpParseError> {
    let invalid = || GpParseError::InvalidFormat {
        input: input.to_string(),
    };

    let normalized = input.trim().to_lowercase().replace(',', "");

    let (number, multiplier) = match normalized.chars().last() {
        Some('k') => (&normalized[..normalized.len() - 1], 1_000.0),
        Some('m') => (&normalized[..normalized.len() - 1], 1_000_000.0),
        Some('b') => (&normalized[..normalized.len() - 1], 1_000_000_000.0),
        _ => (normalized.as_str(), 1.0),
    };

    if !is_plain_decimal(number) {
        return Err(invalid());
    }

    let value: f64 = number.parse().map_err(|_| invalid())?;
    let scaled = (value * multiplier).round();

    // i64::MAX is not representable as f64; the bound is exclusive on the upper side.
    if !scaled.is_finite() || scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
        return Err(invalid());
    }

    Ok(scaled as i64)
}

/// Sign, digits, at most one point. Rejects exponents, `inf`, `nan` and
/// anything else `f64::from_str` would otherwise let through.
fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(|ch: char| ch == '-' || ch == '+').unwrap_or(text);

    let mut digits = 0;
    let mut points = 0;
    for ch in unsigned.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }

    digits > 0 && points <= 1
}

/// Formats an amount with thousands separators, e.g. `1,250,000`.
pub fn format_gp(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if amount < 0 {
        out.push('-');
    }

    let lead = match digits.len() % 3 {
        0 => 3,
        n => n,
    };
    out.push_str(&digits[..lead.min(digits.len())]);

    let mut idx = lead;
    while idx < digits.len() {
        out.push(',');
        out.push_str(&digits[idx..idx + 3]);
        idx += 3;
    }

    out
}
