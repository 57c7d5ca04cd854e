use super::{Analyzer, ScanSummary, round3};
use crate::Result;
use crate::log::AggregationResult;

pub struct SummaryAnalyzer;

impl Analyzer for SummaryAnalyzer {
    type Output = ScanSummary;

    fn analyze(&self, result: &AggregationResult) -> Result<Self::Output> {
        let summary = ScanSummary {
            lines_read: result.lines_read,
            parse_errors: result.parse_errors,
            error_rate: round3(result.error_rate()),
            total_requests: result.total_requests,
            total_time: round3(result.total_time),
            distinct_urls: result.urls.len(),
            stopped_early: result.stopped_early,
        };

        tracing::debug!(
            "Scan summary: {} lines, {} requests, {} URLs, total time {:.3}s",
            summary.lines_read,
            summary.total_requests,
            summary.distinct_urls,
            summary.total_time
        );

        Ok(summary)
    }
}
