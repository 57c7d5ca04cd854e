use assert_cmd::Command;
use flate2::Compression;
use flate2::write::GzEncoder;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use urlstat_cli::commands::report::{ReportOutcome, generate_report};
use urlstat_core::Config;

#[allow(deprecated)]
fn get_urlstat_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("urlstat")
}

fn fixture_log_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join("log")
}

fn log_line(url: &str, time: &str) -> String {
    format!(
        r#"1.196.116.32 -  - [29/Jun/2017:03:50:22 +0300] "GET {} HTTP/1.1" 200 927 "-" "curl" "-" "1498697422-2190034393-4708-9752759" "dc7161be3" {}"#,
        url, time
    )
}

/// Write a config file pointing at the given directories
fn write_config(dir: &Path, log_dir: &Path, report_dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(
        &path,
        format!(
            "[settings]\nLOG_DIR = '{}'\nREPORT_DIR = '{}'\nREPORT_SIZE = 100\nPERCENT_PARSING_ERRORS = 5\n",
            log_dir.display(),
            report_dir.display()
        ),
    )
    .unwrap();
    path
}

fn config_for(log_dir: &Path, report_dir: &Path) -> Config {
    Config {
        log_dir: log_dir.to_path_buf(),
        report_dir: report_dir.to_path_buf(),
        ..Config::default()
    }
}

#[test]
fn test_generate_report_for_latest_fixture() {
    let reports = TempDir::new().unwrap();
    let config = config_for(&fixture_log_dir(), reports.path());

    let outcome = generate_report(&config).unwrap();

    let expected = reports.path().join("report-2017.06.30.html");
    assert_eq!(
        outcome,
        ReportOutcome::Written {
            path: expected.clone(),
            rows: 5
        }
    );

    let html = fs::read_to_string(&expected).unwrap();
    assert!(html.contains(r#""url":"/api/v2/banner/25019354","count":3"#));
    assert!(!html.contains("/api/v2/old"), "older log must not be read");
    assert!(!html.contains("$table_json"));
}

#[test]
fn test_generate_report_skips_existing_report() {
    let reports = TempDir::new().unwrap();
    let config = config_for(&fixture_log_dir(), reports.path());

    let existing = reports.path().join("report-2017.06.30.html");
    fs::write(&existing, "previous run").unwrap();

    let outcome = generate_report(&config).unwrap();

    assert_eq!(outcome, ReportOutcome::AlreadyGenerated(existing.clone()));
    assert_eq!(fs::read_to_string(&existing).unwrap(), "previous run");
}

#[test]
fn test_generate_report_without_logs() {
    let logs = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();
    let config = config_for(logs.path(), reports.path());

    assert_eq!(generate_report(&config).unwrap(), ReportOutcome::NoLogFiles);
    assert_eq!(fs::read_dir(reports.path()).unwrap().count(), 0);
}

#[test]
fn test_generate_report_when_no_line_parses() {
    let logs = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();
    fs::write(
        logs.path().join("nginx-access-ui.log-20170630"),
        "garbage\nmore garbage\n",
    )
    .unwrap();
    let config = Config {
        percent_parsing_errors: 100.0,
        ..config_for(logs.path(), reports.path())
    };

    let outcome = generate_report(&config).unwrap();

    let expected = reports.path().join("report-2017.06.30.html");
    assert_eq!(
        outcome,
        ReportOutcome::NoRequests {
            path: expected.clone(),
            lines: 2
        }
    );
    let html = fs::read_to_string(&expected).unwrap();
    assert!(html.contains("var table = [];"));
}

#[test]
fn test_report_command_writes_report() {
    let work = TempDir::new().unwrap();
    let reports = work.path().join("reports");
    let config = write_config(work.path(), &fixture_log_dir(), &reports);

    let mut cmd = Command::new(get_urlstat_bin());
    cmd.arg("--config").arg(&config).arg("report");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("report-2017.06.30.html"));

    assert!(reports.join("report-2017.06.30.html").exists());
}

#[test]
fn test_report_command_second_run_is_noop() {
    let work = TempDir::new().unwrap();
    let reports = work.path().join("reports");
    let config = write_config(work.path(), &fixture_log_dir(), &reports);

    Command::new(get_urlstat_bin())
        .arg("--config")
        .arg(&config)
        .arg("report")
        .assert()
        .success();
    let first = fs::read_to_string(reports.join("report-2017.06.30.html")).unwrap();

    Command::new(get_urlstat_bin())
        .arg("--config")
        .arg(&config)
        .arg("report")
        .assert()
        .success()
        .stderr(predicate::str::contains("already generated"));

    let second = fs::read_to_string(reports.join("report-2017.06.30.html")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_report_command_reads_gzip_log() {
    let work = TempDir::new().unwrap();
    let logs = work.path().join("log");
    let reports = work.path().join("reports");
    fs::create_dir(&logs).unwrap();

    fs::write(
        logs.join("nginx-access-ui.log-20170101"),
        log_line("/plain/older", "0.1"),
    )
    .unwrap();
    let file = File::create(logs.join("nginx-access-ui.log-20170630.gz")).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    writeln!(encoder, "{}", log_line("/gzip/newer", "0.2")).unwrap();
    writeln!(encoder, "{}", log_line("/gzip/newer", "0.4")).unwrap();
    encoder.finish().unwrap();

    let config = write_config(work.path(), &logs, &reports);
    Command::new(get_urlstat_bin())
        .arg("--config")
        .arg(&config)
        .arg("report")
        .assert()
        .success();

    let html = fs::read_to_string(reports.join("report-2017.06.30.html")).unwrap();
    assert!(html.contains(r#""url":"/gzip/newer","count":2"#));
    assert!(!html.contains("/plain/older"));
}

#[test]
fn test_report_command_fails_on_error_rate() {
    let work = TempDir::new().unwrap();
    let logs = work.path().join("log");
    let reports = work.path().join("reports");
    fs::create_dir(&logs).unwrap();

    let mut lines: Vec<String> = (0..4).map(|i| log_line(&format!("/u{}", i), "0.1")).collect();
    lines.extend((0..6).map(|i| format!("broken line {}", i)));
    fs::write(logs.join("nginx-access-ui.log-20170630"), lines.join("\n")).unwrap();

    let config = write_config(work.path(), &logs, &reports);
    Command::new(get_urlstat_bin())
        .arg("--config")
        .arg(&config)
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("6 of 10 lines exceed"));

    assert!(!reports.join("report-2017.06.30.html").exists());
}

#[test]
fn test_report_command_empty_log() {
    let work = TempDir::new().unwrap();
    let logs = work.path().join("log");
    let reports = work.path().join("reports");
    fs::create_dir(&logs).unwrap();
    File::create(logs.join("nginx-access-ui.log-20170630")).unwrap();

    let config = write_config(work.path(), &logs, &reports);
    Command::new(get_urlstat_bin())
        .arg("--config")
        .arg(&config)
        .arg("report")
        .assert()
        .success()
        .stderr(predicate::str::contains("is empty"));

    assert!(!reports.join("report-2017.06.30.html").exists());
}

#[test]
fn test_report_command_missing_config() {
    let work = TempDir::new().unwrap();

    Command::new(get_urlstat_bin())
        .arg("--config")
        .arg(work.path().join("missing.toml"))
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_report_command_writes_log_file() {
    let work = TempDir::new().unwrap();
    let reports = work.path().join("reports");
    let log_file = work.path().join("urlstat.log");
    let config = write_config(work.path(), &fixture_log_dir(), &reports);
    let mut content = fs::read_to_string(&config).unwrap();
    content.push_str(&format!("LOG_FILE_PATH = '{}'\n", log_file.display()));
    fs::write(&config, content).unwrap();

    Command::new(get_urlstat_bin())
        .arg("--config")
        .arg(&config)
        .arg("report")
        .assert()
        .success();

    let diagnostics = fs::read_to_string(&log_file).unwrap();
    assert!(diagnostics.contains("report-2017.06.30.html"));
}
