use super::{Analyzer, StatsRow, round3};
use crate::log::{AggregationResult, UrlSamples};
use crate::{Error, Result};

/// Ranks URLs by total request time and builds one report row per URL
pub struct StatsCalculator {
    max_rows: usize,
}

impl StatsCalculator {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }
}

impl Default for StatsCalculator {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Analyzer for StatsCalculator {
    type Output = Vec<StatsRow>;

    fn analyze(&self, result: &AggregationResult) -> Result<Self::Output> {
        tracing::debug!("Computing statistics for {} URLs", result.urls.len());

        if result.total_requests == 0 {
            return Err(Error::Analysis(
                "No parsed requests to compute statistics from".to_string(),
            ));
        }

        let mut ranked: Vec<(&UrlSamples, f64)> = result
            .urls
            .iter()
            .filter(|samples| !samples.durations.is_empty())
            .map(|samples| (samples, samples.time_sum()))
            .collect();
        // Stable sort keeps first-seen order among equal sums
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(self.max_rows);

        let rows: Vec<StatsRow> = ranked
            .into_iter()
            .map(|(samples, time_sum)| {
                url_stats(samples, time_sum, result.total_requests, result.total_time)
            })
            .collect();

        tracing::info!(
            "Statistics complete: {} rows out of {} URLs",
            rows.len(),
            result.urls.len()
        );

        Ok(rows)
    }
}

fn url_stats(
    samples: &UrlSamples,
    time_sum: f64,
    total_requests: usize,
    total_time: f64,
) -> StatsRow {
    let count = samples.durations.len();

    let mut sorted = samples.durations.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));
    // Lower median: no interpolation for even counts
    let time_med = sorted[count / 2];
    let time_max = sorted[count - 1];

    // A log where every request took 0s has no time to share out
    let time_perc = if total_time > 0.0 {
        time_sum / total_time
    } else {
        0.0
    };

    StatsRow {
        url: samples.url.clone(),
        count,
        count_perc: round3(count as f64 / total_requests as f64),
        time_sum: round3(time_sum),
        time_perc: round3(time_perc),
        time_avg: round3(time_sum / count as f64),
        time_max: round3(time_max),
        time_med: round3(time_med),
    }
}
