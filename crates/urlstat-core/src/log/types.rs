use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// How the content of a log file is stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Plain,
    Gzip,
}

/// A log file chosen for processing, identified by the date in its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileReference {
    pub path: PathBuf,
    pub date: NaiveDate,
    pub compression: Compression,
}

impl LogFileReference {
    pub fn new(path: impl Into<PathBuf>, date: NaiveDate, compression: Compression) -> Self {
        Self {
            path: path.into(),
            date,
            compression,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Date in the `YYYY.MM.DD` form used to name reports
    pub fn report_date(&self) -> String {
        self.date.format("%Y.%m.%d").to_string()
    }

    pub fn is_compressed(&self) -> bool {
        self.compression == Compression::Gzip
    }
}

/// URL and request duration (seconds) extracted from one log line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub url: String,
    pub duration: f64,
}
