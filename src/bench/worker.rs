//! Randomized async workers
//!
//! A [`WorkerFactory`] draws a bounds pair for every worker it creates. Each
//! invocation of a [`RandomWorker`] then draws a fresh sample scaled by those
//! bounds, sleeps, and settles with a value or a sentinel outcome.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::bench::random::RandomSource;
use crate::{RaceBenchError, MAX_DURATION, MAX_POWER};

/// Expected failure outcomes of a worker's random sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentinelError {
    /// Sampled power was zero
    Zero,
    /// Sampled power was exactly half of the power bound
    Half,
    /// Sampled power was exactly the power bound
    Bingo,
}

impl fmt::Display for SentinelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentinelError::Zero => write!(f, "Function produced 0 power"),
            SentinelError::Half => {
                write!(f, "Function produced power for exactly half of maximum")
            }
            SentinelError::Bingo => write!(f, "Function produced exactly maximum power"),
        }
    }
}

impl std::error::Error for SentinelError {}

/// How a single worker invocation settled
#[derive(Debug)]
pub enum WorkerOutcome {
    /// Resolved with a value
    Success(u64),
    /// Failed with one of the expected sentinel outcomes
    Sentinel(SentinelError),
    /// Failed with anything else
    Failure(RaceBenchError),
}

impl WorkerOutcome {
    /// Value produced by a successful invocation
    pub fn value(&self) -> Option<u64> {
        match self {
            WorkerOutcome::Success(value) => Some(*value),
            _ => None,
        }
    }

    /// Sentinel kind, if the invocation settled with one
    pub fn sentinel(&self) -> Option<SentinelError> {
        match self {
            WorkerOutcome::Sentinel(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WorkerOutcome::Success(_))
    }
}

/// Boxed future returned by [`Worker::invoke`]
pub type WorkerFuture<'a> = Pin<Box<dyn Future<Output = WorkerOutcome> + Send + 'a>>;

/// Anything the benchmark can race
pub trait Worker: Send + Sync {
    /// Start one invocation
    fn invoke(&self) -> WorkerFuture<'_>;
}

/// Adapter turning an async closure into a [`Worker`]
pub struct FnWorker<F> {
    operation: F,
}

impl<F> FnWorker<F> {
    pub fn new(operation: F) -> Self {
        Self { operation }
    }
}

impl<F, Fut> Worker for FnWorker<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = WorkerOutcome> + Send + 'static,
{
    fn invoke(&self) -> WorkerFuture<'_> {
        Box::pin((self.operation)())
    }
}

/// Upper limits fixed when a worker is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Exclusive upper limit for sampled power
    pub power: u64,
    /// Exclusive upper limit for sampled duration, in milliseconds
    pub duration: u64,
}

impl Bounds {
    /// Power value that triggers the half outcome
    pub fn half_power(&self) -> u64 {
        self.power / 2
    }
}

/// Values drawn for a single invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub power: u64,
    /// Delay in milliseconds
    pub duration: u64,
}

/// `floor(rnd * bound)`
fn scale(rnd: f64, bound: u64) -> u64 {
    (rnd * bound as f64).floor() as u64
}

/// Worker that samples power and duration on every invocation
#[derive(Debug, Clone)]
pub struct RandomWorker {
    bounds: Bounds,
    rng: Arc<dyn RandomSource>,
}

impl RandomWorker {
    /// Create a worker with explicit bounds
    pub fn with_bounds(bounds: Bounds, rng: Arc<dyn RandomSource>) -> Self {
        Self { bounds, rng }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Draw a fresh sample pair scaled by this worker's bounds
    pub fn draw_sample(&self) -> Sample {
        let (power, duration) = self.rng.next_pair();
        Sample {
            power: scale(power, self.bounds.power),
            duration: scale(duration, self.bounds.duration),
        }
    }

    /// Run one invocation with a freshly drawn sample
    pub async fn run(&self) -> WorkerOutcome {
        let sample = self.draw_sample();
        self.run_sample(sample).await
    }

    /// Settle an invocation for a given sample.
    ///
    /// Zero is checked first and fails without sleeping, so it wins over the
    /// half outcome whenever the half power is itself zero. The half outcome
    /// fires after half the sampled duration; every other path sleeps the
    /// full duration.
    pub async fn run_sample(&self, sample: Sample) -> WorkerOutcome {
        if sample.power == 0 {
            return WorkerOutcome::Sentinel(SentinelError::Zero);
        }

        if sample.power == self.bounds.half_power() {
            tokio::time::sleep(Duration::from_millis(sample.duration / 2)).await;
            return WorkerOutcome::Sentinel(SentinelError::Half);
        }

        tokio::time::sleep(Duration::from_millis(sample.duration)).await;

        if sample.power == self.bounds.power {
            return WorkerOutcome::Sentinel(SentinelError::Bingo);
        }

        WorkerOutcome::Success(sample.power)
    }
}

impl Worker for RandomWorker {
    fn invoke(&self) -> WorkerFuture<'_> {
        Box::pin(self.run())
    }
}

/// Creates [`RandomWorker`]s with randomly drawn bounds
#[derive(Debug, Clone)]
pub struct WorkerFactory {
    rng: Arc<dyn RandomSource>,
    max_power: u64,
    max_duration: u64,
}

impl WorkerFactory {
    /// Create a factory using [`MAX_POWER`] and [`MAX_DURATION`]
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self::with_limits(rng, MAX_POWER, MAX_DURATION)
    }

    /// Create a factory with custom limits for the bounds draw
    pub fn with_limits(rng: Arc<dyn RandomSource>, max_power: u64, max_duration: u64) -> Self {
        Self {
            rng,
            max_power,
            max_duration,
        }
    }

    pub fn max_power(&self) -> u64 {
        self.max_power
    }

    /// Duration limit in milliseconds
    pub fn max_duration(&self) -> u64 {
        self.max_duration
    }

    /// Draw a bounds pair and close a new worker over it
    pub fn create_worker(&self) -> RandomWorker {
        let (power, duration) = self.rng.next_pair();
        let bounds = Bounds {
            power: scale(power, self.max_power),
            duration: scale(duration, self.max_duration),
        };
        RandomWorker::with_bounds(bounds, Arc::clone(&self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::random::{FixedRandom, SequenceRandom};
    use tokio::time::Instant;

    fn factory(value: f64) -> WorkerFactory {
        WorkerFactory::new(Arc::new(FixedRandom(value)))
    }

    fn worker_with(bounds: Bounds, values: Vec<f64>) -> RandomWorker {
        RandomWorker::with_bounds(bounds, Arc::new(SequenceRandom::new(values)))
    }

    #[test]
    fn test_create_worker_draws_bounds() {
        let rng = Arc::new(SequenceRandom::new(vec![0.1, 0.2]));
        let factory = WorkerFactory::new(rng.clone());
        let worker = factory.create_worker();

        assert_eq!(worker.bounds(), Bounds { power: 500, duration: 10000 });
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_custom_limits() {
        let factory = WorkerFactory::with_limits(Arc::new(FixedRandom(0.5)), 100, 1000);
        let worker = factory.create_worker();
        assert_eq!(worker.bounds(), Bounds { power: 50, duration: 500 });
    }

    #[test]
    fn test_sentinel_messages() {
        assert_eq!(SentinelError::Zero.to_string(), "Function produced 0 power");
        assert_eq!(
            SentinelError::Half.to_string(),
            "Function produced power for exactly half of maximum"
        );
        assert_eq!(
            SentinelError::Bingo.to_string(),
            "Function produced exactly maximum power"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_fails_without_delay() {
        let worker = factory(0.0).create_worker();
        let start = Instant::now();

        let outcome = worker.run().await;

        assert_eq!(outcome.sentinel(), Some(SentinelError::Zero));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_fails_after_half_duration() {
        // bounds (2500, 25000), sample (1250, 12500)
        let worker = factory(0.5).create_worker();
        let start = Instant::now();

        let outcome = worker.run().await;

        assert_eq!(outcome.sentinel(), Some(SentinelError::Half));
        assert_eq!(start.elapsed(), Duration::from_millis(6250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_delay_rounds_down() {
        let worker = worker_with(Bounds { power: 10, duration: 100 }, vec![0.0]);
        let start = Instant::now();

        let outcome = worker.run_sample(Sample { power: 5, duration: 25 }).await;

        assert_eq!(outcome.sentinel(), Some(SentinelError::Half));
        assert_eq!(start.elapsed(), Duration::from_millis(12));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bingo_fails_after_full_duration() {
        let worker = factory(1.0).create_worker();
        assert_eq!(worker.bounds(), Bounds { power: MAX_POWER, duration: MAX_DURATION });
        let start = Instant::now();

        let outcome = worker.run().await;

        assert_eq!(outcome.sentinel(), Some(SentinelError::Bingo));
        assert_eq!(start.elapsed(), Duration::from_millis(MAX_DURATION));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_power_after_duration() {
        // bounds (500, 5000), sample (50, 500)
        let worker = factory(0.1).create_worker();
        let start = Instant::now();

        let outcome = worker.run().await;

        assert_eq!(outcome.value(), Some(50));
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_invocation_resamples() {
        let worker = worker_with(
            Bounds { power: 100, duration: 1000 },
            vec![0.25, 0.5, 0.75, 0.125],
        );

        assert_eq!(worker.run().await.value(), Some(25));
        assert_eq!(worker.run().await.value(), Some(75));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_wins_over_half() {
        // half of 1 is 0, so the only reachable power collides with both checks
        let worker = worker_with(Bounds { power: 1, duration: 1000 }, vec![0.9, 0.9]);
        assert_eq!(worker.bounds().half_power(), 0);

        let start = Instant::now();
        let outcome = worker.run().await;

        assert_eq!(outcome.sentinel(), Some(SentinelError::Zero));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_bounds_always_zero() {
        let worker = worker_with(Bounds { power: 0, duration: 0 }, vec![0.7]);
        assert_eq!(worker.run().await.sentinel(), Some(SentinelError::Zero));
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_samples() {
        let worker = worker_with(Bounds { power: 10, duration: 100 }, vec![0.0]);

        let half = worker.run_sample(Sample { power: 5, duration: 80 }).await;
        assert_eq!(half.sentinel(), Some(SentinelError::Half));

        let bingo = worker.run_sample(Sample { power: 10, duration: 80 }).await;
        assert_eq!(bingo.sentinel(), Some(SentinelError::Bingo));

        let value = worker.run_sample(Sample { power: 7, duration: 80 }).await;
        assert!(value.is_success());
        assert_eq!(value.value(), Some(7));
    }

    #[tokio::test]
    async fn test_fn_worker() {
        let worker = FnWorker::new(|| async { WorkerOutcome::Success(9) });
        assert_eq!(worker.invoke().await.value(), Some(9));
    }
}
