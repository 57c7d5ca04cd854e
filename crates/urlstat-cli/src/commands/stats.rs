use crate::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use urlstat_core::Config;
use urlstat_core::analysis::{Analyzer, ScanSummary, StatsCalculator, StatsRow, SummaryAnalyzer};
use urlstat_core::log::{LogAggregator, LogSelector};

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub log_file: PathBuf,
    pub report_date: String,
    pub summary: ScanSummary,
    pub rows: Vec<StatsRow>,
}

/// Aggregate a log and compute its statistics without writing a report
///
/// Uses `file` when given, otherwise the latest log in `config.log_dir`.
/// Returns `None` when there is no log to read or the log is empty.
pub fn analyze_log(config: &Config, file: Option<&Path>) -> Result<Option<StatsReport>> {
    let selector = LogSelector::new(&config.log_prefix)?;
    let log_file = match file {
        Some(path) => selector.reference_for(path)?,
        None => match selector.select_latest(&config.log_dir)? {
            Some(reference) => reference,
            None => {
                tracing::info!("No log files found in {}", config.log_dir.display());
                return Ok(None);
            }
        },
    };

    let Some(result) = LogAggregator::from_config(config)
        .aggregate(&log_file)
        .with_context(|| format!("Failed to read {}", log_file.path.display()))?
        .into_result()?
    else {
        return Ok(None);
    };

    let summary = SummaryAnalyzer.analyze(&result)?;
    let rows = if summary.total_requests == 0 {
        tracing::warn!("No line of {} could be parsed", log_file.path.display());
        Vec::new()
    } else {
        StatsCalculator::new(config.report_size).analyze(&result)?
    };

    Ok(Some(StatsReport {
        report_date: log_file.report_date(),
        log_file: log_file.path,
        summary,
        rows,
    }))
}

pub fn execute(config: &Config, file: Option<&Path>, format: OutputFormat) -> Result<()> {
    let Some(report) = analyze_log(config, file)? else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Csv => write_csv(&report.rows, io::stdout().lock())?,
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn output_pretty(report: &StatsReport) {
    use console::style;

    println!(
        "\n{}",
        style(format!("Request times for {}", report.report_date))
            .bold()
            .cyan()
    );
    println!("{}", style("==============================").cyan());

    println!("\n{}", style("Summary:").bold());
    println!("  Log File:        {}", report.log_file.display());
    println!("  Lines Read:      {}", report.summary.lines_read);
    println!(
        "  Parse Errors:    {} ({:.1}%)",
        report.summary.parse_errors,
        report.summary.error_rate * 100.0
    );
    println!("  Requests:        {}", report.summary.total_requests);
    println!("  Total Time:      {:.3} s", report.summary.total_time);
    println!("  Distinct URLs:   {}", report.summary.distinct_urls);
    if report.summary.stopped_early {
        println!(
            "  {}",
            style("Scan stopped at the configured cap").yellow()
        );
    }

    if !report.rows.is_empty() {
        println!("\n{}", style("Slowest URLs by total time:").bold());
        for (i, row) in report.rows.iter().enumerate() {
            println!(
                "  {}. [{:.3} s, {:.1}%] {} x{} avg={:.3} med={:.3} max={:.3}",
                i + 1,
                row.time_sum,
                row.time_perc * 100.0,
                row.url,
                row.count,
                row.time_avg,
                row.time_med,
                row.time_max
            );
        }
    }

    println!();
}

fn output_json(report: &StatsReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

/// Write rows as CSV; URLs containing commas or quotes are quoted
pub fn write_csv<W: Write>(rows: &[StatsRow], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv.write_record([
            "url",
            "count",
            "count_perc",
            "time_sum",
            "time_perc",
            "time_avg",
            "time_max",
            "time_med",
        ])?;
    }
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}
