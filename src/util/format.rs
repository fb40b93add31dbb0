//! Display formatting for sizes, timestamps, and file kinds.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use std::fmt;

use chrono::{DateTime, Utc};

/// Byte count rendered with a binary unit, e.g. `1.5 MB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl fmt::Display for ByteSize {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
        if self.0 < 1024 {
            return write!(f, "{} B", self.0);
        }
        let mut value = self.0 as f64 / 1024.0;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        write!(f, "{value:.1} {}", UNITS[unit])
    }
}

/// Human-readable size string.
pub fn human_size(bytes: u64) -> String {
    ByteSize(bytes).to_string()
}

/// Relative age such as `5m ago`, falling back to a date after a week.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    match secs {
        s if s < 60 => "just now".to_owned(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 7 * 86_400 => format!("{}d ago", s / 86_400),
        _ => then.format("%b %-d, %Y").to_string(),
    }
}

/// Short date-time label used in lists.
pub fn short_datetime(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %H:%M").to_string()
}

/// Icon for a MIME type.
pub fn mime_icon(mime: &str) -> &'static str {
    let mime = mime.to_ascii_lowercase();
    if mime.starts_with("image/") {
        "🖼️"
    } else if mime == "application/pdf" {
        "📕"
    } else if mime.starts_with("video/") {
        "🎬"
    } else if mime.starts_with("audio/") {
        "🎵"
    } else if mime.contains("spreadsheet") || mime.contains("excel") || mime == "text/csv" {
        "📊"
    } else if mime.contains("word") || mime.starts_with("text/") {
        "📄"
    } else if mime.contains("zip") || mime.contains("compressed") {
        "🗜️"
    } else {
        "📎"
    }
}
