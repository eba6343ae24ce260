//! Units formatting utilities
//!
//! Provides helpers for turning measured delays and averages into the
//! strings used by reports and the terminal summary.

use std::time::Duration;

/// Whole milliseconds in a duration, truncated
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use racebench::util::units::whole_millis;
///
/// assert_eq!(whole_millis(Duration::from_micros(1999)), 1);
/// ```
pub fn whole_millis(duration: Duration) -> u128 {
    duration.as_nanos() / 1_000_000
}

/// Format a worker delay as truncated milliseconds
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use racebench::util::units::format_delay;
///
/// assert_eq!(format_delay(Duration::from_micros(500_900)), "500ms");
/// ```
pub fn format_delay(duration: Duration) -> String {
    format!("{}ms", whole_millis(duration))
}

/// Format an optional delay, `n/a` when absent
pub fn format_optional_delay(duration: Option<Duration>) -> String {
    match duration {
        Some(d) => format_delay(d),
        None => "n/a".to_string(),
    }
}

/// Format an optional average value, `n/a` when absent
///
/// # Examples
/// ```
/// use racebench::util::units::format_average;
///
/// assert_eq!(format_average(Some(12.5)), "12.50");
/// assert_eq!(format_average(None), "n/a");
/// ```
pub fn format_average(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

/// Format duration into human-readable string
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use racebench::util::units::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 3600 {
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if total_secs >= 60 {
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{}m {}s", minutes, seconds)
    } else if total_secs > 0 {
        if millis > 0 {
            format!("{}.{:02}s", total_secs, millis / 10)
        } else {
            format!("{}s", total_secs)
        }
    } else {
        format!("{}ms", millis)
    }
}
