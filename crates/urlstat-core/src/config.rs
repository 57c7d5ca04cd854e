use crate::log::DEFAULT_LOG_PREFIX;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one pipeline run
///
/// Read from the `[settings]` table of a TOML file. Keys may be written in
/// snake case or in the upper case spelling of older config files
/// (`REPORT_SIZE`, `LOG_DIR`, ...). Missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Maximum number of URLs in a report; also caps distinct URLs while scanning
    #[serde(alias = "REPORT_SIZE")]
    pub report_size: usize,

    #[serde(alias = "REPORT_DIR")]
    pub report_dir: PathBuf,

    #[serde(alias = "LOG_DIR")]
    pub log_dir: PathBuf,

    /// Allowed share of unparseable lines, in percent
    #[serde(alias = "PERCENT_PARSING_ERRORS")]
    pub percent_parsing_errors: f64,

    /// Write diagnostics to this file instead of stderr
    #[serde(alias = "LOG_FILE_PATH")]
    pub log_file_path: Option<PathBuf>,

    #[serde(alias = "LOG_PREFIX")]
    pub log_prefix: String,

    #[serde(alias = "REPORT_TEMPLATE")]
    pub report_template: Option<PathBuf>,

    #[serde(alias = "MAX_LINES")]
    pub max_lines: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_size: 1000,
            report_dir: PathBuf::from("./reports"),
            log_dir: PathBuf::from("./log"),
            percent_parsing_errors: 5.0,
            log_file_path: None,
            log_prefix: DEFAULT_LOG_PREFIX.to_string(),
            report_template: None,
            max_lines: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: Config,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading configuration from: {}", path.display());

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        file.settings.validate()?;
        Ok(file.settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.report_size == 0 {
            return Err(Error::InvalidConfig(
                "report_size must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.percent_parsing_errors) {
            return Err(Error::InvalidConfig(format!(
                "percent_parsing_errors must be between 0 and 100, got {}",
                self.percent_parsing_errors
            )));
        }
        if self.log_prefix.is_empty() {
            return Err(Error::InvalidConfig("log_prefix must not be empty".to_string()));
        }
        if self.max_lines == Some(0) {
            return Err(Error::InvalidConfig("max_lines must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Error ceiling as a fraction of lines read
    pub fn max_error_rate(&self) -> f64 {
        self.percent_parsing_errors / 100.0
    }
}
