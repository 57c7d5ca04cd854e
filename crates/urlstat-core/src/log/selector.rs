use super::{Compression, LogFileReference};
use crate::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::Path;

pub const DEFAULT_LOG_PREFIX: &str = "nginx-access-ui.log-";

/// Finds the most recent log file in a directory by the date embedded in its name
///
/// Candidate names are `<prefix>YYYYMMDD` or `<prefix>YYYYMMDD.gz`. Anything else
/// in the directory is ignored, as are subdirectories.
#[derive(Debug, Clone)]
pub struct LogSelector {
    pattern: Regex,
}

impl LogSelector {
    pub fn new(prefix: &str) -> Result<Self> {
        if prefix.is_empty() {
            return Err(Error::InvalidConfig("Log file prefix is empty".to_string()));
        }

        let pattern = Regex::new(&format!(
            r"^{}(?P<date>\d{{8}})(?P<gz>\.gz)?$",
            regex::escape(prefix)
        ))
        .map_err(|e| Error::InvalidConfig(format!("Invalid log file prefix '{}': {}", prefix, e)))?;

        Ok(Self { pattern })
    }

    /// Match a single file name against the naming contract
    pub fn match_name(&self, file_name: &str) -> Option<(NaiveDate, Compression)> {
        let captures = self.pattern.captures(file_name)?;
        let date = match NaiveDate::parse_from_str(&captures["date"], "%Y%m%d") {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!("Skipping {}: invalid date in file name ({})", file_name, e);
                return None;
            }
        };
        let compression = if captures.name("gz").is_some() {
            Compression::Gzip
        } else {
            Compression::Plain
        };
        Some((date, compression))
    }

    /// Pick the log file with the greatest embedded date
    ///
    /// Returns `Ok(None)` when the directory is missing or holds no matching file.
    /// The file contents are never opened.
    pub fn select_latest(&self, dir: &Path) -> Result<Option<LogFileReference>> {
        tracing::debug!("Looking for log files in: {}", dir.display());

        if !dir.is_dir() {
            tracing::debug!("Log directory {} does not exist", dir.display());
            return Ok(None);
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            entries.push(entry.path());
        }
        // Directory order is platform dependent
        entries.sort();

        let mut latest: Option<LogFileReference> = None;
        for path in entries {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some((date, compression)) = self.match_name(file_name) else {
                continue;
            };

            if latest.as_ref().is_none_or(|current| date > current.date) {
                latest = Some(LogFileReference::new(path, date, compression));
            }
        }

        match &latest {
            Some(reference) => tracing::info!(
                "Latest log file: {} ({})",
                reference.path.display(),
                reference.date
            ),
            None => tracing::debug!("No matching log files in {}", dir.display()),
        }

        Ok(latest)
    }

    /// Build a reference for an explicitly named file
    pub fn reference_for(&self, path: &Path) -> Result<LogFileReference> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidConfig(format!("Invalid log path: {}", path.display())))?;

        let (date, compression) = self.match_name(file_name).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "Log file name '{}' does not carry a YYYYMMDD date",
                file_name
            ))
        })?;

        Ok(LogFileReference::new(path, date, compression))
    }
}
