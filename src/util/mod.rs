//! Utility functions module
//!
//! Contains helper functions for formatting delays and averages.

pub mod units;

// Re-export commonly used functions
pub use units::{
    format_average, format_delay, format_duration, format_optional_delay, whole_millis,
};
