//! Conversion between human time notation and seconds
//!
//! Accepted input forms: `SS[.fff]`, `M:SS[.fff]` and `H:MM:SS[.fff]`, with
//! either `.` or `,` as the decimal separator and an optional leading `-`.

use crate::error::TimeError;
use std::fmt;

/// A time value as supplied by a caller: raw seconds or a time string.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSpec {
    Seconds(f64),
    Text(String),
}

impl From<f64> for TimeSpec {
    fn from(value: f64) -> Self {
        TimeSpec::Seconds(value)
    }
}

impl From<&str> for TimeSpec {
    fn from(value: &str) -> Self {
        TimeSpec::Text(value.to_string())
    }
}

impl From<String> for TimeSpec {
    fn from(value: String) -> Self {
        TimeSpec::Text(value)
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSpec::Seconds(s) => write!(f, "{}", s),
            TimeSpec::Text(t) => f.write_str(t),
        }
    }
}

/// Parse a time spec into seconds.
///
/// A leading `-` is rejected with [`TimeError::Negative`] unless
/// `allow_negative` is set; every structural problem is a
/// [`TimeError::InvalidFormat`].
pub fn parse_time(spec: &TimeSpec, allow_negative: bool) -> Result<f64, TimeError> {
    match spec {
        TimeSpec::Seconds(value) => {
            if !value.is_finite() {
                return Err(TimeError::InvalidFormat(value.to_string()));
            }
            if !allow_negative && *value < 0.0 {
                return Err(TimeError::Negative);
            }
            Ok(*value)
        }
        TimeSpec::Text(text) => parse_time_str(text, allow_negative),
    }
}

/// Parse a time string into seconds. See [`parse_time`].
pub fn parse_time_str(input: &str, allow_negative: bool) -> Result<f64, TimeError> {
    let trimmed = input.trim();
    let invalid = || TimeError::InvalidFormat(input.to_string());

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => {
            if !allow_negative {
                return Err(TimeError::Negative);
            }
            (true, rest)
        }
        None => (false, trimmed),
    };

    let body = body.replace(',', ".");
    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() > 3 {
        return Err(invalid());
    }

    let (last, leading) = parts.split_last().ok_or_else(invalid)?;
    let mut seconds = parse_fractional(last).ok_or_else(invalid)?;

    // Leading components, nearest first: minutes, then hours.
    for (part, scale) in leading.iter().rev().zip([60.0, 3600.0]) {
        seconds += parse_integer(part).ok_or_else(invalid)? * scale;
    }

    if negative {
        seconds = -seconds;
    }
    Ok(seconds)
}

fn parse_integer(part: &str) -> Option<f64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse::<u64>().ok().map(|v| v as f64)
}

fn parse_fractional(part: &str) -> Option<f64> {
    let digits = part.bytes().filter(u8::is_ascii_digit).count();
    let dots = part.bytes().filter(|&b| b == b'.').count();
    if digits == 0 || dots > 1 || digits + dots != part.len() {
        return None;
    }
    part.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format seconds as `H:MM:SS.fff`, `M:SS.fff` or `S.fff`.
///
/// The value is rounded to whole milliseconds. Trailing fractional zeros
/// are dropped, as is the decimal point when the fraction is zero.
pub fn format_time(seconds: f64) -> Result<String, TimeError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(TimeError::InvalidFormat(seconds.to_string()));
    }

    let total_ms = (seconds * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    let fraction = if millis == 0 {
        String::new()
    } else {
        format!(".{:03}", millis).trim_end_matches('0').to_string()
    };

    Ok(if hours > 0 {
        format!("{}:{:02}:{:02}{}", hours, minutes, secs, fraction)
    } else if minutes > 0 {
        format!("{}:{:02}{}", minutes, secs, fraction)
    } else {
        format!("{}{}", secs, fraction)
    })
}
