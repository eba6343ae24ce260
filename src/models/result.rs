//! Benchmark result data models
//!
//! Contains the statistics record folded from a batch of settled workers
//! and the tally of sentinel outcomes.

use crate::bench::worker::SentinelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Count of workers removed from the statistics, per sentinel kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SentinelTally {
    pub zero: usize,
    pub half: usize,
    pub bingo: usize,
}

impl SentinelTally {
    /// Count one sentinel outcome
    pub fn record(&mut self, kind: SentinelError) {
        match kind {
            SentinelError::Zero => self.zero += 1,
            SentinelError::Half => self.half += 1,
            SentinelError::Bingo => self.bingo += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.zero + self.half + self.bingo
    }
}

/// Statistics over the workers of one batch that succeeded
///
/// Field names serialize in the `Total`, `FastestWorker`, ... form that
/// report consumers expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BenchmarkSummary {
    /// When the batch finished
    pub timestamp: DateTime<Utc>,
    /// Number of workers in the batch
    pub workers: usize,
    /// Workers that succeeded (batch size minus sentinel outcomes)
    pub total: usize,
    /// Batch index of the worker with the strictly smallest delay
    pub fastest_worker: Option<usize>,
    /// Value produced by the fastest worker
    pub fastest_value: Option<u64>,
    #[serde(with = "duration_serde")]
    pub minimum_delay: Duration,
    #[serde(with = "duration_serde")]
    pub sum_delay: Duration,
    pub sum_value: u64,
    #[serde(with = "duration_serde")]
    pub maximum_delay: Duration,
    pub maximum_value: u64,
    /// Workers removed from the statistics
    pub sentinels: SentinelTally,
    /// Wall time for the whole batch
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
}

impl BenchmarkSummary {
    /// Initial state for a batch of `workers` workers.
    ///
    /// The minimum delay starts at `delay_ceiling` so only a strictly faster
    /// worker can claim the fastest slot.
    pub fn new(workers: usize, delay_ceiling: Duration) -> Self {
        Self {
            timestamp: Utc::now(),
            workers,
            total: workers,
            fastest_worker: None,
            fastest_value: None,
            minimum_delay: delay_ceiling,
            sum_delay: Duration::ZERO,
            sum_value: 0,
            maximum_delay: Duration::ZERO,
            maximum_value: 0,
            sentinels: SentinelTally::default(),
            elapsed: Duration::ZERO,
        }
    }

    /// Fold in a successful worker
    pub fn record_success(&mut self, index: usize, delay: Duration, value: u64) {
        self.sum_delay += delay;
        self.sum_value += value;
        if self.maximum_value < value {
            self.maximum_value = value;
        }
        if self.maximum_delay < delay {
            self.maximum_delay = delay;
        }
        if self.minimum_delay > delay {
            self.minimum_delay = delay;
            self.fastest_worker = Some(index);
            self.fastest_value = Some(value);
        }
    }

    /// Drop a worker that settled with a sentinel outcome from the count
    pub fn record_sentinel(&mut self, kind: SentinelError) {
        self.total -= 1;
        self.sentinels.record(kind);
    }

    /// Stamp the batch wall time and completion time
    pub fn finish(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
        self.timestamp = Utc::now();
    }

    /// Mean delay over successful workers
    pub fn average_delay(&self) -> Option<Duration> {
        if self.total == 0 {
            return None;
        }
        let avg_nanos = self.sum_delay.as_nanos() / self.total as u128;
        Some(Duration::from_nanos(avg_nanos as u64))
    }

    /// Mean value over successful workers
    pub fn average_value(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.sum_value as f64 / self.total as f64)
    }

    /// Get a human-readable one-line summary
    pub fn summary(&self) -> String {
        match (self.fastest_worker, self.fastest_value) {
            (Some(index), Some(value)) => format!(
                "{} - {}/{} succeeded - fastest #{} ({:.0}ms, value {}) - max {:.0}ms",
                self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                self.total,
                self.workers,
                index,
                self.minimum_delay.as_secs_f64() * 1000.0,
                value,
                self.maximum_delay.as_secs_f64() * 1000.0
            ),
            _ => format!(
                "{} - {}/{} succeeded",
                self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                self.total,
                self.workers
            ),
        }
    }
}

// Custom serde module for Duration serialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Nanoseconds, to match high resolution timer readings
        (duration.as_nanos() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ceiling() -> Duration {
        Duration::from_millis(crate::MAX_DURATION)
    }

    #[test]
    fn test_initial_state() {
        let summary = BenchmarkSummary::new(10, ceiling());

        assert_eq!(summary.workers, 10);
        assert_eq!(summary.total, 10);
        assert_eq!(summary.fastest_worker, None);
        assert_eq!(summary.fastest_value, None);
        assert_eq!(summary.minimum_delay, ceiling());
        assert_eq!(summary.sum_value, 0);
        assert_eq!(summary.sum_delay, Duration::ZERO);
        assert_eq!(summary.maximum_value, 0);
        assert_eq!(summary.maximum_delay, Duration::ZERO);
    }

    #[test]
    fn test_record_success_tracks_extremes() {
        let mut summary = BenchmarkSummary::new(3, ceiling());
        summary.record_success(0, Duration::from_millis(300), 10);
        summary.record_success(1, Duration::from_millis(100), 40);
        summary.record_success(2, Duration::from_millis(500), 20);

        assert_eq!(summary.fastest_worker, Some(1));
        assert_eq!(summary.fastest_value, Some(40));
        assert_eq!(summary.minimum_delay, Duration::from_millis(100));
        assert_eq!(summary.maximum_delay, Duration::from_millis(500));
        assert_eq!(summary.maximum_value, 40);
        assert_eq!(summary.sum_value, 70);
        assert_eq!(summary.sum_delay, Duration::from_millis(900));
    }

    #[test]
    fn test_fastest_requires_strictly_smaller_delay() {
        let mut summary = BenchmarkSummary::new(2, ceiling());
        summary.record_success(0, Duration::from_millis(200), 1);
        summary.record_success(1, Duration::from_millis(200), 2);
        assert_eq!(summary.fastest_worker, Some(0));

        // A delay equal to the ceiling never claims the slot
        let mut summary = BenchmarkSummary::new(1, ceiling());
        summary.record_success(0, ceiling(), 5);
        assert_eq!(summary.fastest_worker, None);
        assert_eq!(summary.sum_value, 5);
    }

    #[test]
    fn test_record_sentinel() {
        let mut summary = BenchmarkSummary::new(4, ceiling());
        summary.record_sentinel(SentinelError::Zero);
        summary.record_sentinel(SentinelError::Half);
        summary.record_sentinel(SentinelError::Half);

        assert_eq!(summary.total, 1);
        assert_eq!(summary.sentinels.zero, 1);
        assert_eq!(summary.sentinels.half, 2);
        assert_eq!(summary.sentinels.bingo, 0);
        assert_eq!(summary.sentinels.total(), 3);
    }

    #[test]
    fn test_averages() {
        let mut summary = BenchmarkSummary::new(3, ceiling());
        summary.record_success(0, Duration::from_millis(100), 10);
        summary.record_success(1, Duration::from_millis(300), 30);
        summary.record_sentinel(SentinelError::Bingo);

        assert_eq!(summary.average_delay(), Some(Duration::from_millis(200)));
        assert_eq!(summary.average_value(), Some(20.0));
    }

    #[test]
    fn test_averages_with_no_successes() {
        let mut summary = BenchmarkSummary::new(1, ceiling());
        summary.record_sentinel(SentinelError::Zero);
        assert_eq!(summary.average_delay(), None);
        assert_eq!(summary.average_value(), None);
    }

    #[test]
    fn test_serialized_field_names() {
        let mut summary = BenchmarkSummary::new(1, ceiling());
        summary.record_success(0, Duration::from_millis(5), 7);
        let json = serde_json::to_value(&summary).expect("Failed to serialize");

        for field in [
            "Total",
            "FastestWorker",
            "FastestValue",
            "MinimumDelay",
            "SumDelay",
            "SumValue",
            "MaximumDelay",
            "MaximumValue",
        ] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
        assert_eq!(json["MinimumDelay"], 5_000_000);
        assert_eq!(json["FastestValue"], 7);
    }

    #[test]
    fn test_summary_line() {
        let mut summary = BenchmarkSummary::new(2, ceiling());
        summary.record_success(1, Duration::from_millis(250), 12);
        summary.record_sentinel(SentinelError::Zero);

        let line = summary.summary();
        assert!(line.contains("1/2 succeeded"));
        assert!(line.contains("fastest #1"));
        assert!(line.contains("value 12"));
    }
}
