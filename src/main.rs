use racebench::config::BenchmarkConfig;
use racebench::error::user_friendly_message;
use racebench::runner::{ask_config, run_race};
use racebench::util::units::format_duration;
use racebench::{report, Result};
use std::io::BufRead;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

fn setup_logging() {
    let level = if std::env::var_os("RACEBENCH_QUIET").is_some() {
        Level::ERROR
    } else if std::env::var_os("RACEBENCH_VERBOSE").is_some() {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
    }
}

async fn run() -> Result<()> {
    let mut config = BenchmarkConfig::load()?;

    println!(
        "Racing {} workers (max power {}, max duration {}ms)",
        config.worker_count, config.max_power, config.max_duration_ms
    );
    println!("Press Enter to accept default config or type 'c' to change:");
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    input.read_line(&mut line)?;
    if line.trim().eq_ignore_ascii_case("c") {
        config = ask_config(config, &mut input)?;
        config.save()?;
        println!("Settings saved to {}", BenchmarkConfig::config_file_path()?.display());
    }
    drop(input);

    let summary = run_race(&config).await?;
    println!("\n{}", summary.summary());
    println!("Batch time: {}", format_duration(summary.elapsed));

    report::write_report(&config.report_path, config.report_format, &summary)?;
    println!("Report written to {}", config.report_path.display());
    Ok(())
}

#[tokio::main]
async fn main() {
    setup_logging();

    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("{}", user_friendly_message(&e));
        std::process::exit(1);
    }
}
