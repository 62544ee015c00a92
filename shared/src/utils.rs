//! # Shared Utility Functions
//!
//! Display helpers used across the dashboard client and tooling.
//!
//! ## Number Formatting
//!
//! Functions for compacting large counters for dashboard display:
//! - [`format_count`] - Compact counts with K/M suffixes (12.4K, 1.2M)
//! - [`format_bytes`] - Human-readable byte sizes (3.5 MB)
//! - [`format_percent`] - Ratios as percentages with one decimal (4.7%)
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::format_count;
//!
//! assert_eq!(format_count(12_400), "12.4K");
//! assert_eq!(format_count(847), "847");
//! ```

/// Format a counter compactly with a K or M suffix.
///
/// Values below 1000 are rendered as-is; larger values get one decimal place.
/// Negative values keep their sign (subscriber deltas can be negative).
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_count;
///
/// assert_eq!(format_count(950), "950");
/// assert_eq!(format_count(12_400), "12.4K");
/// assert_eq!(format_count(2_300_000), "2.3M");
/// assert_eq!(format_count(-1_500), "-1.5K");
/// ```
pub fn format_count(count: i64) -> String {
    let sign = if count < 0 { "-" } else { "" };
    let abs = count.unsigned_abs();

    if abs < 1_000 {
        format!("{}{}", sign, abs)
    } else if abs < 1_000_000 {
        format!("{}{:.1}K", sign, abs as f64 / 1_000.0)
    } else {
        format!("{}{:.1}M", sign, abs as f64 / 1_000_000.0)
    }
}

/// Format a byte count using binary units up to GB.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(2048), "2.0 KB");
/// assert_eq!(format_bytes(3_670_016), "3.5 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    }
}

/// Format a 0.0..=1.0 ratio as a percentage with one decimal place.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_percent;
///
/// assert_eq!(format_percent(0.047), "4.7%");
/// assert_eq!(format_percent(1.0), "100.0%");
/// ```
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1.0K");
        assert_eq!(format_count(12_400), "12.4K");
        assert_eq!(format_count(1_000_000), "1.0M");
        assert_eq!(format_count(2_345_678), "2.3M");
    }

    #[test]
    fn test_format_count_negative() {
        assert_eq!(format_count(-42), "-42");
        assert_eq!(format_count(-1_500), "-1.5K");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1024 * 1024 * 5 / 2), "2.5 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(0.047), "4.7%");
        assert_eq!(format_percent(0.5), "50.0%");
    }
}
