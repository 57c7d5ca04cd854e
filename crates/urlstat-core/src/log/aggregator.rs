use super::{LineParser, LogFileReference};
use crate::{Config, Error, Result};
use flate2::read::MultiGzDecoder;
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Duration samples collected for one URL, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct UrlSamples {
    pub url: String,
    pub durations: Vec<f64>,
}

impl UrlSamples {
    pub fn time_sum(&self) -> f64 {
        self.durations.iter().sum()
    }
}

/// Everything a completed scan produced
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    /// Per-URL samples in first-seen order
    pub urls: Vec<UrlSamples>,
    /// Successfully parsed lines
    pub total_requests: usize,
    /// Sum of all parsed durations
    pub total_time: f64,
    pub lines_read: usize,
    pub parse_errors: usize,
    /// Scanning stopped at a cap before the end of input
    pub stopped_early: bool,
}

impl AggregationResult {
    pub fn error_rate(&self) -> f64 {
        if self.lines_read == 0 {
            0.0
        } else {
            self.parse_errors as f64 / self.lines_read as f64
        }
    }
}

/// Parse failures measured against the configured ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorRate {
    pub errors: usize,
    pub lines: usize,
    pub ceiling: f64,
}

impl ErrorRate {
    pub fn ratio(&self) -> f64 {
        self.errors as f64 / self.lines as f64
    }
}

/// Result of scanning one log file
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Parsed(AggregationResult),
    /// The input contained no lines at all
    Empty,
    ErrorRateExceeded(ErrorRate),
}

impl ScanOutcome {
    /// Treat an exceeded error rate as a hard failure; `Empty` becomes `None`
    pub fn into_result(self) -> Result<Option<AggregationResult>> {
        match self {
            ScanOutcome::Parsed(result) => Ok(Some(result)),
            ScanOutcome::Empty => Ok(None),
            ScanOutcome::ErrorRateExceeded(rate) => Err(Error::ErrorRateExceeded {
                errors: rate.errors,
                lines: rate.lines,
                ceiling: rate.ceiling,
            }),
        }
    }
}

#[derive(Default)]
struct AggregationState {
    samples: IndexMap<String, Vec<f64>>,
    total_requests: usize,
    total_time: f64,
    lines_read: usize,
    parse_errors: usize,
}

impl AggregationState {
    fn record(&mut self, line: &str) {
        self.lines_read += 1;
        match LineParser::parse(line) {
            Ok(parsed) => {
                self.total_requests += 1;
                self.total_time += parsed.duration;
                self.samples
                    .entry(parsed.url)
                    .or_default()
                    .push(parsed.duration);
            }
            Err(failure) => {
                self.parse_errors += 1;
                tracing::trace!("Line {} not parsed: {}", self.lines_read, failure);
            }
        }
    }

    fn finish(self, stopped_early: bool) -> AggregationResult {
        AggregationResult {
            urls: self
                .samples
                .into_iter()
                .map(|(url, durations)| UrlSamples { url, durations })
                .collect(),
            total_requests: self.total_requests,
            total_time: self.total_time,
            lines_read: self.lines_read,
            parse_errors: self.parse_errors,
            stopped_early,
        }
    }
}

/// Streams a log file line by line and groups request times by URL
///
/// Scanning ends at end of input, or as soon as `max_urls` distinct URLs have
/// been seen, or after `max_lines` lines when that cap is set. Totals always
/// describe the lines actually scanned.
#[derive(Debug, Clone)]
pub struct LogAggregator {
    max_urls: usize,
    max_error_rate: f64,
    max_lines: Option<usize>,
}

impl LogAggregator {
    pub fn new(max_urls: usize, max_error_rate: f64) -> Self {
        Self {
            max_urls,
            max_error_rate,
            max_lines: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.report_size, config.max_error_rate()).with_max_lines(config.max_lines)
    }

    pub fn with_max_lines(mut self, max_lines: Option<usize>) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Open the referenced file, decompressing gzip content on the fly
    pub fn aggregate(&self, reference: &LogFileReference) -> Result<ScanOutcome> {
        tracing::debug!("Reading log file: {}", reference.path.display());

        let file = File::open(&reference.path)?;
        if reference.is_compressed() {
            self.aggregate_reader(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            self.aggregate_reader(BufReader::new(file))
        }
    }

    pub fn aggregate_reader<R: BufRead>(&self, mut reader: R) -> Result<ScanOutcome> {
        let mut state = AggregationState::default();
        let mut buf = Vec::new();
        let mut stopped_early = false;

        loop {
            if self.max_lines.is_some_and(|max| state.lines_read >= max) {
                tracing::debug!("Line cap of {} reached", state.lines_read);
                stopped_early = true;
                break;
            }

            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            state.record(&String::from_utf8_lossy(&buf));

            if state.samples.len() >= self.max_urls {
                tracing::debug!("Distinct URL cap of {} reached", self.max_urls);
                stopped_early = true;
                break;
            }
        }

        if state.lines_read == 0 {
            tracing::info!("Log file is empty");
            return Ok(ScanOutcome::Empty);
        }

        let rate = ErrorRate {
            errors: state.parse_errors,
            lines: state.lines_read,
            ceiling: self.max_error_rate,
        };
        if rate.ratio() > self.max_error_rate {
            tracing::warn!(
                "Parsing errors in {} of {} lines exceed the allowed ratio {}",
                rate.errors,
                rate.lines,
                rate.ceiling
            );
            return Ok(ScanOutcome::ErrorRateExceeded(rate));
        }

        tracing::info!(
            "Parsed {} of {} lines, {} parsing errors, {} distinct URLs",
            state.total_requests,
            state.lines_read,
            state.parse_errors,
            state.samples.len()
        );

        Ok(ScanOutcome::Parsed(state.finish(stopped_early)))
    }
}
