//! Data models module
//!
//! Contains the benchmark statistics record and sentinel tallies.

pub mod result;

// Re-export commonly used types
pub use result::{BenchmarkSummary, SentinelTally};
