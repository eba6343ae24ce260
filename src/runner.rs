use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::bench::race::{BenchmarkProgress, RaceBenchmark};
use crate::bench::worker::{Worker, WorkerFactory};
use crate::config::BenchmarkConfig;
use crate::models::BenchmarkSummary;
use crate::Result;
use tracing::warn;

/// Build the batch of workers for a run.
///
/// By default one worker is created and shared by every slot, so the whole
/// batch races the same bounds pair. With `distinct_workers` each slot gets
/// its own bounds.
pub fn build_workers(config: &BenchmarkConfig, factory: &WorkerFactory) -> Vec<Arc<dyn Worker>> {
    if config.distinct_workers {
        (0..config.worker_count)
            .map(|_| Arc::new(factory.create_worker()) as Arc<dyn Worker>)
            .collect()
    } else {
        let worker: Arc<dyn Worker> = Arc::new(factory.create_worker());
        vec![worker; config.worker_count]
    }
}

/// Prompt the user for simple configuration overrides.
pub fn ask_config<R: BufRead>(mut config: BenchmarkConfig, input: &mut R) -> Result<BenchmarkConfig> {
    print!("Number of workers (default {}): ", config.worker_count);
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    if let Ok(v) = line.trim().parse::<usize>() {
        config.worker_count = v;
    }

    line.clear();
    print!(
        "Share one worker across the batch? [{}] (y/n): ",
        if config.distinct_workers { "n" } else { "y" }
    );
    io::stdout().flush()?;
    input.read_line(&mut line)?;
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => config.distinct_workers = false,
        "n" | "no" => config.distinct_workers = true,
        _ => {}
    }

    config.validate()?;
    Ok(config)
}

/// Run a batch built from the configuration and stream progress to a bar.
pub async fn run_race(config: &BenchmarkConfig) -> Result<BenchmarkSummary> {
    config.validate()?;
    let factory = config.worker_factory();
    let workers = build_workers(config, &factory);

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);
    let pb = indicatif::ProgressBar::new(workers.len() as u64);
    if let Ok(style) =
        indicatif::ProgressStyle::with_template("{spinner} {pos}/{len} settled ({elapsed}) {msg}")
    {
        pb.set_style(style);
    }

    let handle = tokio::spawn(async move {
        while let Some(BenchmarkProgress {
            settled,
            succeeded,
            sentinels,
            ..
        }) = rx.recv().await
        {
            pb.set_position(settled as u64);
            pb.set_message(format!("{} ok, {} dropped", succeeded, sentinels));
        }
        pb.finish();
    });

    let result = RaceBenchmark::new()
        .with_delay_ceiling(config.delay_ceiling())
        .with_progress(tx)
        .run(&workers)
        .await;
    if let Err(e) = handle.await {
        warn!(error = %e, "progress display task failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::random::FixedRandom;
    use std::io::Cursor;

    fn factory() -> WorkerFactory {
        WorkerFactory::new(Arc::new(FixedRandom(0.1)))
    }

    #[test]
    fn test_shared_workers() {
        let config = BenchmarkConfig::new().with_worker_count(5);
        let workers = build_workers(&config, &factory());

        assert_eq!(workers.len(), 5);
        assert!(workers.iter().all(|w| Arc::ptr_eq(w, &workers[0])));
    }

    #[test]
    fn test_distinct_workers() {
        let config = BenchmarkConfig::new()
            .with_worker_count(3)
            .with_distinct_workers(true);
        let workers = build_workers(&config, &factory());

        assert_eq!(workers.len(), 3);
        assert!(!Arc::ptr_eq(&workers[0], &workers[1]));
    }

    #[test]
    fn test_ask_config_overrides() {
        let mut input = Cursor::new("7\nn\n");
        let config = ask_config(BenchmarkConfig::new(), &mut input).unwrap();
        assert_eq!(config.worker_count, 7);
        assert!(config.distinct_workers);
    }

    #[test]
    fn test_ask_config_keeps_defaults_on_empty_input() {
        let mut input = Cursor::new("");
        let config = ask_config(BenchmarkConfig::new(), &mut input).unwrap();
        assert_eq!(config.worker_count, 100);
        assert!(!config.distinct_workers);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_race_seeded() {
        let config = BenchmarkConfig::new().with_worker_count(10).with_seed(3);
        let summary = run_race(&config).await.unwrap();

        assert_eq!(summary.workers, 10);
        assert_eq!(summary.total + summary.sentinels.total(), 10);
    }
}
