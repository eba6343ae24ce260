//! Concurrent race benchmark
//!
//! Fans a batch of workers out onto a `JoinSet`, times each one around its
//! own invocation, and folds the settled outcomes into a
//! [`BenchmarkSummary`]. Sentinel outcomes are tallied and dropped from the
//! statistics; any other failure aborts the batch.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::bench::worker::{Worker, WorkerOutcome};
use crate::models::BenchmarkSummary;
use crate::{RaceBenchError, Result, MAX_DURATION};

/// Progress update sent each time a worker settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkProgress {
    /// Workers settled so far
    pub settled: usize,
    /// Workers that succeeded so far
    pub succeeded: usize,
    /// Workers that settled with a sentinel outcome so far
    pub sentinels: usize,
    /// Number of workers in the batch
    pub workers: usize,
}

impl BenchmarkProgress {
    /// Calculate completion percentage (0.0 to 1.0)
    pub fn completion_percentage(&self) -> f64 {
        if self.workers == 0 {
            0.0
        } else {
            (self.settled as f64) / (self.workers as f64)
        }
    }
}

/// Race benchmark executor
#[derive(Debug, Clone)]
pub struct RaceBenchmark {
    delay_ceiling: Duration,
    progress_tx: Option<mpsc::Sender<BenchmarkProgress>>,
}

impl Default for RaceBenchmark {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceBenchmark {
    /// Create an executor whose fastest-delay tracking starts at [`MAX_DURATION`]
    pub fn new() -> Self {
        Self {
            delay_ceiling: Duration::from_millis(MAX_DURATION),
            progress_tx: None,
        }
    }

    /// Set the initial minimum delay
    pub fn with_delay_ceiling(mut self, ceiling: Duration) -> Self {
        self.delay_ceiling = ceiling;
        self
    }

    /// Stream a progress update after every settled worker
    pub fn with_progress(mut self, progress_tx: mpsc::Sender<BenchmarkProgress>) -> Self {
        self.progress_tx = Some(progress_tx);
        self
    }

    /// Run every worker concurrently and fold the results.
    ///
    /// Returns once all workers have settled. The first worker that fails
    /// with a non-sentinel error ends the run with that error. Invocations
    /// still in flight are detached, not cancelled, and settle on their own.
    pub async fn run(&self, workers: &[Arc<dyn Worker>]) -> Result<BenchmarkSummary> {
        let batch_start = Instant::now();
        let mut summary = BenchmarkSummary::new(workers.len(), self.delay_ceiling);
        info!(workers = workers.len(), "starting race benchmark");

        let mut tasks = JoinSet::new();
        for (index, worker) in workers.iter().enumerate() {
            let worker = Arc::clone(worker);
            tasks.spawn(async move {
                let start = Instant::now();
                let outcome = worker.invoke().await;
                (index, start.elapsed(), outcome)
            });
        }

        let mut settled = 0usize;
        while let Some(joined) = tasks.join_next().await {
            let (index, delay, outcome) = match joined {
                Ok(settled_worker) => settled_worker,
                Err(e) => {
                    warn!(error = %e, "worker task did not complete");
                    tasks.detach_all();
                    return Err(join_error(e));
                }
            };
            settled += 1;

            match outcome {
                WorkerOutcome::Success(value) => {
                    debug!(index, value, delay_ms = delay.as_millis() as u64, "worker succeeded");
                    summary.record_success(index, delay, value);
                }
                WorkerOutcome::Sentinel(kind) => {
                    debug!(index, outcome = %kind, "worker dropped from statistics");
                    summary.record_sentinel(kind);
                }
                WorkerOutcome::Failure(err) => {
                    warn!(index, error = %err, "worker failed, aborting benchmark");
                    tasks.detach_all();
                    return Err(err);
                }
            }

            if let Some(progress_tx) = &self.progress_tx {
                let update = BenchmarkProgress {
                    settled,
                    succeeded: settled - summary.sentinels.total(),
                    sentinels: summary.sentinels.total(),
                    workers: workers.len(),
                };
                // Receiver may be gone; the benchmark still completes
                let _ = progress_tx.send(update).await;
            }
        }

        summary.finish(batch_start.elapsed());
        info!(
            succeeded = summary.total,
            workers = summary.workers,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "race benchmark finished"
        );
        Ok(summary)
    }
}

fn join_error(e: tokio::task::JoinError) -> RaceBenchError {
    if e.is_panic() {
        RaceBenchError::WorkerError(format!("Worker panicked: {}", e))
    } else {
        RaceBenchError::BenchmarkError(format!("Worker task was cancelled: {}", e))
    }
}

/// Run a batch with default settings
pub async fn run_benchmark(workers: &[Arc<dyn Worker>]) -> Result<BenchmarkSummary> {
    RaceBenchmark::new().run(workers).await
}
