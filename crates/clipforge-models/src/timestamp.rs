//! Clip timestamp parsing.
//!
//! Start offsets and clip durations arrive as human-readable strings
//! (`HH:MM:SS`, `MM:SS`, or bare seconds, each with an optional `.mmm`
//! fraction) and are rendered back to `HH:MM:SS` form when a job's
//! inputs are persisted.

use thiserror::Error;

/// Error for malformed timestamp strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    #[error("timestamp cannot be empty")]
    Empty,

    #[error("timestamp cannot be negative")]
    Negative,

    #[error("invalid {component} value: {value}")]
    InvalidValue {
        component: &'static str,
        value: String,
    },

    #[error("invalid timestamp format '{0}'; use HH:MM:SS, MM:SS, or SS")]
    InvalidFormat(String),
}

/// Parse a timestamp string to fractional seconds.
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    if parts.len() > 3 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    // Rightmost component is seconds, then minutes, then hours.
    const COMPONENTS: [&str; 3] = ["seconds", "minutes", "hours"];
    let mut total = 0.0;
    let mut scale = 1.0;
    for (i, part) in parts.iter().rev().enumerate() {
        let value: f64 = part.parse().map_err(|_| TimestampError::InvalidValue {
            component: COMPONENTS[i],
            value: part.to_string(),
        })?;
        if value < 0.0 {
            return Err(TimestampError::Negative);
        }
        total += value * scale;
        scale *= 60.0;
    }

    Ok(total)
}

/// Render fractional seconds as `HH:MM:SS` (or `HH:MM:SS.mmm`).
pub fn format_seconds(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}
