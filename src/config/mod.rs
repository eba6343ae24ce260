//! Configuration management module
//!
//! Handles loading, saving, and validation of benchmark configuration.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bench::random::{RandomSource, ThreadRandom};
use crate::bench::worker::WorkerFactory;
use crate::{RaceBenchError, Result, APP_NAME, CONFIG_FILE, MAX_DURATION, MAX_POWER, REPORT_FILE};

/// Benchmark configuration structure containing all run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Number of workers raced in one batch
    pub worker_count: usize,
    /// Upper limit for each worker's power bound
    pub max_power: u64,
    /// Upper limit for each worker's duration bound, in milliseconds
    pub max_duration_ms: u64,
    /// Create a separate worker per slot instead of sharing one worker
    pub distinct_workers: bool,
    /// Seed for reproducible runs
    pub seed: Option<u64>,
    /// Where the report is written
    pub report_path: PathBuf,
    /// Report output format
    pub report_format: ReportFormat,
}

/// Output format for the benchmark report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Standalone HTML page
    Html,
    /// JSON document of the statistics record
    Json,
    /// Plain text lines
    Text,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            worker_count: 100,
            max_power: MAX_POWER,
            max_duration_ms: MAX_DURATION,
            distinct_workers: false,
            seed: None,
            report_path: PathBuf::from(REPORT_FILE),
            report_format: ReportFormat::Html,
        }
    }
}

impl BenchmarkConfig {
    /// Create a new benchmark configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(RaceBenchError::ConfigError(
                "Worker count must be greater than 0".to_string(),
            ));
        }

        const MAX_WORKERS: usize = 100_000;
        if self.worker_count > MAX_WORKERS {
            return Err(RaceBenchError::ConfigError(format!(
                "Too many workers: {} (max: {})",
                self.worker_count, MAX_WORKERS
            )));
        }

        if self.max_power == 0 {
            return Err(RaceBenchError::ConfigError(
                "Maximum power must be greater than 0".to_string(),
            ));
        }

        if self.max_duration_ms == 0 {
            return Err(RaceBenchError::ConfigError(
                "Maximum duration must be greater than 0".to_string(),
            ));
        }

        const DURATION_LIMIT_MS: u64 = 3_600_000; // 1 hour
        if self.max_duration_ms > DURATION_LIMIT_MS {
            return Err(RaceBenchError::ConfigError(format!(
                "Maximum duration too long: {}ms (max: {}ms)",
                self.max_duration_ms, DURATION_LIMIT_MS
            )));
        }

        if self.report_path.as_os_str().is_empty() {
            return Err(RaceBenchError::ConfigError(
                "Report path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Set the number of workers per batch
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    /// Set the limits for the bounds draw
    pub fn with_limits(mut self, max_power: u64, max_duration_ms: u64) -> Self {
        self.max_power = max_power;
        self.max_duration_ms = max_duration_ms;
        self
    }

    /// Set whether every slot gets its own worker
    pub fn with_distinct_workers(mut self, distinct: bool) -> Self {
        self.distinct_workers = distinct;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the report destination
    pub fn with_report_path(mut self, path: PathBuf) -> Self {
        self.report_path = path;
        self
    }

    /// Set the report format
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Largest delay a worker can be assigned
    pub fn delay_ceiling(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }

    /// Random source for this configuration, seeded when a seed is set
    pub fn random_source(&self) -> Arc<dyn RandomSource> {
        match self.seed {
            Some(seed) => Arc::new(ThreadRandom::seeded(seed)),
            None => Arc::new(ThreadRandom::new()),
        }
    }

    /// Worker factory using this configuration's limits and random source
    pub fn worker_factory(&self) -> WorkerFactory {
        WorkerFactory::with_limits(self.random_source(), self.max_power, self.max_duration_ms)
    }

    /// Load configuration from the standard config file location
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            RaceBenchError::ConfigError(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            RaceBenchError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the standard config file location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RaceBenchError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| {
            RaceBenchError::ConfigError(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/racebench/racebench.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            RaceBenchError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

impl ReportFormat {
    /// Get a human-readable description of the format
    pub fn description(&self) -> &'static str {
        match self {
            ReportFormat::Html => "HTML",
            ReportFormat::Json => "JSON",
            ReportFormat::Text => "Text",
        }
    }
}
