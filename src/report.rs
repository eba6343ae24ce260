//! Benchmark report rendering
//!
//! Renders a [`BenchmarkSummary`] as HTML, JSON, or plain text and writes it
//! to disk.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::ReportFormat;
use crate::models::BenchmarkSummary;
use crate::util::units::{format_average, format_delay, format_optional_delay};
use crate::{RaceBenchError, Result};

const REPORT_TITLE: &str = "Benchmark result";

fn fastest_line(summary: &BenchmarkSummary) -> String {
    match summary.fastest_value {
        Some(value) => format!(
            "(delay: {}, value: {})",
            format_delay(summary.minimum_delay),
            value
        ),
        None => "none".to_string(),
    }
}

/// Render the statistics as a standalone HTML page
pub fn render_html(summary: &BenchmarkSummary) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<p>Total workers: {total}</p>
<p>Fastest Worker: {fastest}</p>
<p>Average Delay: {avg_delay}</p>
<p>Average Value: {avg_value}</p>
<p>Maximum Delay: {max_delay}</p>
<p>Maximum Value: {max_value}</p>
<p>Dropped: zero {zero}, half {half}, bingo {bingo}</p>
<p>Generated: {timestamp}</p>
</body>
</html>
"#,
        title = REPORT_TITLE,
        total = summary.total,
        fastest = fastest_line(summary),
        avg_delay = format_optional_delay(summary.average_delay()),
        avg_value = format_average(summary.average_value()),
        max_delay = format_delay(summary.maximum_delay),
        max_value = summary.maximum_value,
        zero = summary.sentinels.zero,
        half = summary.sentinels.half,
        bingo = summary.sentinels.bingo,
        timestamp = summary.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// Render the statistics as pretty JSON
pub fn render_json(summary: &BenchmarkSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Render the statistics as plain text lines
pub fn render_text(summary: &BenchmarkSummary) -> String {
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        format!("Total workers: {}/{}", summary.total, summary.workers),
        format!("Fastest Worker: {}", fastest_line(summary)),
        format!(
            "Average Delay: {}",
            format_optional_delay(summary.average_delay())
        ),
        format!("Average Value: {}", format_average(summary.average_value())),
        format!("Maximum Delay: {}", format_delay(summary.maximum_delay)),
        format!("Maximum Value: {}", summary.maximum_value),
    ];
    if summary.sentinels.total() > 0 {
        lines.push(format!(
            "Dropped: zero {}, half {}, bingo {}",
            summary.sentinels.zero, summary.sentinels.half, summary.sentinels.bingo
        ));
    }
    lines.push(format!(
        "Batch time: {}",
        humantime::format_duration(summary.elapsed)
    ));
    lines.join("\n") + "\n"
}

/// Render in the requested format
pub fn render(summary: &BenchmarkSummary, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Html => Ok(render_html(summary)),
        ReportFormat::Json => render_json(summary),
        ReportFormat::Text => Ok(render_text(summary)),
    }
}

/// Render and write the report file
pub fn write_report(path: &Path, format: ReportFormat, summary: &BenchmarkSummary) -> Result<()> {
    let content = render(summary, format)?;
    fs::write(path, content).map_err(|e| {
        RaceBenchError::ReportError(format!(
            "Failed to write report {}: {}",
            path.display(),
            e
        ))
    })?;
    info!(path = %path.display(), format = format.description(), "report written");
    Ok(())
}
