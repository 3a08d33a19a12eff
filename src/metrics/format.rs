// Human-readable sizes, durations and relative times.

use chrono::{DateTime, Utc};

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

const DURATION_UNITS: [(f64, &str); 5] = [
    (60.0 * 60.0 * 24.0 * 30.0, "month"),
    (60.0 * 60.0 * 24.0 * 7.0, "week"),
    (60.0 * 60.0 * 24.0, "day"),
    (60.0 * 60.0, "hour"),
    (60.0, "minute"),
];

fn plural(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

/// `1536 -> "1.5 KB"`, `10240 -> "10 KB"`, `1073741824 -> "1 GB"`.
pub fn human_file_size(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".into();
    }
    let mut value = bytes;
    let mut index = 0;
    while value >= 1024.0 && index < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        index += 1;
    }
    let number = if value >= 10.0 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.1}", value);
        s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
    };
    format!("{} {}", number, SIZE_UNITS[index])
}

/// Largest whole unit from month (30 days) down to minute; whole seconds below a minute.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "seconds".into();
    }
    for (unit_seconds, label) in DURATION_UNITS {
        if seconds >= unit_seconds {
            return plural((seconds / unit_seconds).floor() as i64, label);
        }
    }
    plural((seconds.floor() as i64).max(1), "sec")
}

/// "just now", "N mins ago", "N hours ago", "N days ago". Future timestamps read as "just now".
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds().max(0);
    if seconds < 60 {
        return "just now".into();
    }
    if seconds < 3600 {
        return format!("{} ago", plural(seconds / 60, "min"));
    }
    if seconds < 3600 * 24 {
        return format!("{} ago", plural(seconds / 3600, "hour"));
    }
    format!("{} ago", plural(seconds / (3600 * 24), "day"))
}

/// [`relative_time`] for unix seconds; "unknown" when out of range.
pub fn relative_time_from_unix(secs: i64, now: DateTime<Utc>) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(t) => relative_time(t, now),
        None => "unknown".into(),
    }
}

/// First 12 characters of an object id (`sha256:` prefixes are kept, as the Engine sends them).
pub fn truncate_id(value: &str) -> String {
    value.chars().take(12).collect()
}
