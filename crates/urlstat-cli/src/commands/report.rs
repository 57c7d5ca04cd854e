use anyhow::{Context, Result};
use std::path::PathBuf;
use urlstat_core::Config;
use urlstat_core::analysis::{Analyzer, StatsCalculator, SummaryAnalyzer};
use urlstat_core::log::{LogAggregator, LogSelector};
use urlstat_core::report::{ReportWriter, report_path};

/// What a report run ended with
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// No file in the log directory matches the naming pattern
    NoLogFiles,
    /// A report for the latest log already exists; nothing was read
    AlreadyGenerated(PathBuf),
    /// The latest log has no lines
    EmptyLog(PathBuf),
    /// No line of the log could be parsed; a report with an empty table was written
    NoRequests { path: PathBuf, lines: usize },
    Written { path: PathBuf, rows: usize },
}

/// Generate the report for the most recent log in `config.log_dir`
///
/// An exceeded parsing error rate is returned as an error.
pub fn generate_report(config: &Config) -> Result<ReportOutcome> {
    let selector = LogSelector::new(&config.log_prefix)?;
    let Some(log_file) = selector
        .select_latest(&config.log_dir)
        .with_context(|| format!("Failed to list {}", config.log_dir.display()))?
    else {
        return Ok(ReportOutcome::NoLogFiles);
    };

    let path = report_path(&config.report_dir, &log_file);
    if path.exists() {
        return Ok(ReportOutcome::AlreadyGenerated(path));
    }

    let outcome = LogAggregator::from_config(config)
        .aggregate(&log_file)
        .with_context(|| format!("Failed to read {}", log_file.path.display()))?;

    let Some(result) = outcome
        .into_result()
        .with_context(|| format!("Log {} rejected", log_file.path.display()))?
    else {
        return Ok(ReportOutcome::EmptyLog(log_file.path));
    };

    let summary = SummaryAnalyzer.analyze(&result)?;
    tracing::info!(
        "Scanned {} lines of {}: {} requests, {} parsing errors, {} URLs",
        summary.lines_read,
        log_file.path.display(),
        summary.total_requests,
        summary.parse_errors,
        summary.distinct_urls
    );

    // Shares are undefined without requests, so the calculator is skipped
    let rows = if summary.total_requests == 0 {
        Vec::new()
    } else {
        StatsCalculator::new(config.report_size).analyze(&result)?
    };

    let template = ReportWriter::load_template(config.report_template.as_deref())
        .context("Failed to load report template")?;
    ReportWriter::to_file(&template, &rows, &path)
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    if summary.total_requests == 0 {
        return Ok(ReportOutcome::NoRequests {
            path,
            lines: summary.lines_read,
        });
    }

    Ok(ReportOutcome::Written {
        path,
        rows: rows.len(),
    })
}

pub fn execute(config: &Config) -> Result<()> {
    tracing::info!("Generating report from logs in: {}", config.log_dir.display());

    match generate_report(config)? {
        ReportOutcome::NoLogFiles => {
            tracing::info!("No log files found in {}", config.log_dir.display());
        }
        ReportOutcome::AlreadyGenerated(path) => {
            tracing::info!("Report already generated: {}", path.display());
        }
        ReportOutcome::EmptyLog(path) => {
            tracing::info!("Log file {} is empty, no report written", path.display());
        }
        ReportOutcome::NoRequests { path, lines } => {
            tracing::warn!(
                "None of {} lines could be parsed, empty report saved to {}",
                lines,
                path.display()
            );
        }
        ReportOutcome::Written { path, rows } => {
            tracing::info!("Report with {} URLs saved to {}", rows, path.display());
        }
    }

    Ok(())
}
