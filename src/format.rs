use std::time::SystemTime;

use chrono::{DateTime, Local};

pub const DIR_SIZE_DISPLAY: &str = "<DIR>";

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable size with one decimal, in powers of 1024.
///
/// `0` → `"0.0 B"`, `1536` → `"1.5 KB"`, `1073741824` → `"1.0 GB"`.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} PB")
}

/// Local modification time as `YYYY-MM-DD HH:MM`.
pub fn format_modified(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}
