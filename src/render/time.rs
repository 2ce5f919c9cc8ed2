//! Microsecond timestamps as reported by ASM (`lastUpdateMicros`)

use std::fmt::Display;

use chrono::{Local, TimeZone};
use serde_json::Value;

pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format microseconds since the epoch in local time
pub fn format_micros(micros: i64) -> Option<String> {
    format_micros_in(micros, &Local)
}

/// Format microseconds since the epoch in the given zone (sub-second part dropped)
pub fn format_micros_in<Tz>(micros: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let secs = micros / 1_000_000;
    tz.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format(DATE_FORMAT).to_string())
}

/// Read a JSON number (integer or float) as whole microseconds
pub fn micros_of(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_u64().and_then(|v| i64::try_from(v).ok()))
        .or_else(|| value.as_f64().map(|v| v as i64))
}
