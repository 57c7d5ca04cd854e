use clap::ValueEnum;

pub mod commands;

/// How the `stats` command prints its results
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Styled summary and ranked URL list for terminals
    Pretty,
    /// Summary and rows as one JSON document
    Json,
    /// Report rows as CSV with a header line, quoted where needed
    Csv,
}
