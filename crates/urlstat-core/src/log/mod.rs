mod aggregator;
mod parser;
mod selector;
mod types;

pub use aggregator::{AggregationResult, ErrorRate, LogAggregator, ScanOutcome, UrlSamples};
pub use parser::{LineParser, ParseFailure};
pub use selector::{DEFAULT_LOG_PREFIX, LogSelector};
pub use types::*;
