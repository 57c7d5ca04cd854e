mod writer;

pub use writer::{BUILTIN_TEMPLATE, ReportWriter, TABLE_PLACEHOLDER};

use crate::log::LogFileReference;
use std::path::{Path, PathBuf};

/// File name of the report generated for a log, e.g. `report-2017.06.30.html`
pub fn report_file_name(reference: &LogFileReference) -> String {
    format!("report-{}.html", reference.report_date())
}

pub fn report_path(report_dir: &Path, reference: &LogFileReference) -> PathBuf {
    report_dir.join(report_file_name(reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Compression;
    use chrono::NaiveDate;

    #[test]
    fn test_report_path_from_log_date() {
        let reference = LogFileReference::new(
            "log/nginx-access-ui.log-20170630.gz",
            NaiveDate::from_ymd_opt(2017, 6, 30).unwrap(),
            Compression::Gzip,
        );
        assert_eq!(report_file_name(&reference), "report-2017.06.30.html");
        assert_eq!(
            report_path(Path::new("./reports"), &reference),
            PathBuf::from("./reports/report-2017.06.30.html")
        );
    }
}
