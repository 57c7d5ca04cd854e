use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use urlstat_cli::{OutputFormat, commands};

#[derive(Parser)]
#[command(name = "urlstat")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Per-URL request time reports from web server access logs",
    long_about = "urlstat picks the most recent access log in a directory, groups request \
                  times by URL and renders the slowest URLs into an HTML report."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML config file (defaults to ./config.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format for printed statistics
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the HTML report for the latest log, unless it already exists
    Report,

    /// Print statistics for a log without writing a report
    Stats {
        /// Log file to read instead of the latest one in the log directory
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;

    // Initialize logging
    init_logging(cli.verbose, config.log_file_path.as_deref())?;

    // Execute the command
    let result = match cli.command {
        Commands::Report => commands::report::execute(&config),
        Commands::Stats { file } => commands::stats::execute(&config, file.as_deref(), cli.format),
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("urlstat=debug,urlstat_cli=debug,urlstat_core=debug")
    } else {
        EnvFilter::new("urlstat=info,urlstat_cli=info,urlstat_core=info")
    };

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}
