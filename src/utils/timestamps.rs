use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

/// Absolute call time, e.g. `Jan 05, 2024 13:45`
pub fn format_call_time<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    timestamp.format("%b %d, %Y %H:%M").to_string()
}

/// Relative age of an epoch-millisecond timestamp: "2h ago", "3d ago"
pub fn format_age(timestamp_ms: i64) -> String {
    format_age_at(timestamp_ms, Utc::now().timestamp_millis())
}

pub(crate) fn format_age_at(timestamp_ms: i64, now_ms: i64) -> String {
    let seconds = now_ms.saturating_sub(timestamp_ms) / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 0 {
        "in the future".to_string()
    } else if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "just now".to_string()
    }
}

/// Call duration as `45s`, `2m 05s` or `1h 02m 03s`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}
