//! Benchmark engine module
//!
//! Contains the random sources, the randomized worker factory,
//! and the concurrent race benchmark that aggregates worker results.

pub mod race;
pub mod random;
pub mod worker;

// Re-export commonly used types
pub use race::{run_benchmark, BenchmarkProgress, RaceBenchmark};
pub use random::{FixedRandom, RandomSource, SequenceRandom, ThreadRandom};
pub use worker::{
    Bounds, FnWorker, RandomWorker, Sample, SentinelError, Worker, WorkerFactory, WorkerFuture,
    WorkerOutcome,
};
