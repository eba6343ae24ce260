//! RACEBENCH - Randomized async worker race benchmark
//!
//! Generates asynchronous workers that sleep for a random delay and then
//! produce a value or one of three sentinel outcomes, and races batches of
//! them to collect timing statistics.

use std::fmt;

// Public re-exports
pub mod bench;
pub mod config;
pub mod models;
pub mod report;
pub mod runner;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum RaceBenchError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// Benchmark execution error
    BenchmarkError(String),
    /// A worker failed with something other than a sentinel outcome
    WorkerError(String),
    /// Report rendering or writing error
    ReportError(String),
    /// Permission denied for file operations
    PermissionDenied(String),
}

impl fmt::Display for RaceBenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceBenchError::IoError(err) => write!(f, "I/O error: {}", err),
            RaceBenchError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            RaceBenchError::BenchmarkError(msg) => write!(f, "Benchmark error: {}", msg),
            RaceBenchError::WorkerError(msg) => write!(f, "Worker error: {}", msg),
            RaceBenchError::ReportError(msg) => write!(f, "Report error: {}", msg),
            RaceBenchError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
        }
    }
}

impl std::error::Error for RaceBenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RaceBenchError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RaceBenchError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                RaceBenchError::PermissionDenied(format!("Access denied: {}", err))
            }
            _ => RaceBenchError::IoError(err),
        }
    }
}

impl From<serde_json::Error> for RaceBenchError {
    fn from(err: serde_json::Error) -> Self {
        RaceBenchError::ReportError(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for RaceBenchError {
    fn from(err: toml::de::Error) -> Self {
        RaceBenchError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for RaceBenchError {
    fn from(err: toml::ser::Error) -> Self {
        RaceBenchError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for RACEBENCH operations
pub type Result<T> = std::result::Result<T, RaceBenchError>;

/// Error handling utilities
pub mod error {
    use super::RaceBenchError;

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &RaceBenchError) -> String {
        match error {
            RaceBenchError::PermissionDenied(_) => {
                "Permission denied. Check that the report path is writable.".to_string()
            }
            RaceBenchError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            RaceBenchError::ReportError(_) => {
                "Failed to write the benchmark report. Check disk space and permissions."
                    .to_string()
            }
            RaceBenchError::WorkerError(msg) => {
                format!("A worker failed unexpectedly and the batch was aborted: {}", msg)
            }
            _ => error.to_string(),
        }
    }
}

// Common types and constants
pub const APP_NAME: &str = "racebench";
pub const CONFIG_FILE: &str = "racebench.toml";
pub const REPORT_FILE: &str = "result.html";

/// Upper bound for a worker's power bound draw
pub const MAX_POWER: u64 = 5000;
/// Upper bound for a worker's duration bound draw, in milliseconds
pub const MAX_DURATION: u64 = 50000;
