mod stats;
mod summary;

pub use stats::StatsCalculator;
pub use summary::SummaryAnalyzer;

use crate::log::AggregationResult;
use serde::{Deserialize, Serialize};

/// One report row; field names are what report templates read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    pub url: String,
    pub count: usize,
    pub count_perc: f64,
    pub time_sum: f64,
    pub time_perc: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_med: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub lines_read: usize,
    pub parse_errors: usize,
    pub error_rate: f64,
    pub total_requests: usize,
    pub total_time: f64,
    pub distinct_urls: usize,
    pub stopped_early: bool,
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, result: &AggregationResult) -> crate::Result<Self::Output>;
}

/// Round to 3 decimal places on the exact decimal value, ties to even
///
/// Scaling by 1000 first would round the already inexact product, so
/// e.g. 0.0625 or the average of 0.123 and 0.124 would come out one unit high.
pub(crate) fn round3(value: f64) -> f64 {
    format!("{:.3}", value).parse().unwrap_or(value)
}
