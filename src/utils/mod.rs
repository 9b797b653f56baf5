use chrono::{DateTime, Utc};

use crate::domain::OutputFormat;

/// File name for a finished capture, e.g. `webpage_capture_2026-10-18T03-21-05.png`.
///
/// The timestamp is ISO-8601 UTC at second precision with `:` swapped for `-`
/// so it is valid on every filesystem.
pub fn capture_filename(format: OutputFormat, now: DateTime<Utc>) -> String {
    format!(
        "webpage_capture_{}.{}",
        now.format("%Y-%m-%dT%H-%M-%S"),
        format.extension()
    )
}
