use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use time::{macros::format_description, OffsetDateTime};

pub mod logging;
pub mod version;

static ID_COUNTER: AtomicUsize = AtomicUsize::new(1);

pub fn generate_id(prefix: &str) -> String {
    let value = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{value}")
}

/// Compact age: `42s`, `7m`, `1.5h`.
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs_f64();
    if secs < 60.0 {
        format!("{}s", secs.round() as u64)
    } else if secs < 3600.0 {
        format!("{}m", (secs / 60.0).round() as u64)
    } else {
        format!("{:.1}h", secs / 3600.0)
    }
}

/// `2024-01-31 18:05:09 UTC`; falls back to the raw number if out of range.
pub fn format_unix_time(secs: u64) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    i64::try_from(secs)
        .ok()
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .and_then(|dt| dt.format(&format).ok())
        .unwrap_or_else(|| secs.to_string())
}
