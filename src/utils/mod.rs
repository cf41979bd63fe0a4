//! Common utilities and helpers

pub mod logging;
pub mod media_library;

use serde::Serialize;

use crate::error::ShortclipResult;

pub use media_library::{DemoVideo, MediaLibrary};

/// Format file size for display, one decimal above bytes
pub fn format_file_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut value = size as f64;
    let mut unit_index = 0;

    while value >= 1024.0 && unit_index < UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit_index])
    }
}

/// Format a duration in seconds as `MM:SS`; minutes keep growing past an hour
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Pretty JSON for `--json` command output
pub fn to_pretty_json<T: Serialize>(value: &T) -> ShortclipResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
