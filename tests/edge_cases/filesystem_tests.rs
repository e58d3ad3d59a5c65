//! Edge case tests for filesystem-related scenarios

use crate::common::{arg, CliTestRunner};
use ddlog::DdlogError;
use std::fs;

#[test]
fn test_nonexistent_outfile() {
    let runner = CliTestRunner::new().unwrap();

    let error = runner.expect_failure(&["-o", "/nonexistent/path/file.dta"]);
    assert!(error.is_not_found(), "Expected file not found error, got: {}", error);
    assert!(error.to_string().contains("/nonexistent/path/file.dta"));
}

#[test]
fn test_nonexistent_explicit_log_is_not_created() {
    let runner = CliTestRunner::new().unwrap();
    let out = runner.fixture().create_file("clean.csv", "id\n").unwrap();
    let log = runner.fixture().path("typo.log");

    let error = runner.expect_failure(&["-o", arg(&out), "-l", arg(&log)]);
    assert!(matches!(error, DdlogError::FileNotFound { ref path } if path == &log));
    assert!(!log.exists());
    assert!(!runner.fixture().path("clean.log").exists());
}

#[test]
fn test_nonexistent_proclog_aborts_before_write() {
    let runner = CliTestRunner::new().unwrap();
    let out = runner.fixture().create_file("clean.csv", "id\n").unwrap();
    let log = runner.fixture().create_file("clean.log", "previous entry\n").unwrap();

    let error = runner.expect_failure(&["-o", arg(&out), "-p", "missing.out"]);
    assert!(error.is_not_found());
    assert_eq!(fs::read_to_string(&log).unwrap(), "previous entry\n");
}

#[test]
fn test_outfile_is_directory() {
    let runner = CliTestRunner::new().unwrap();
    let dir = runner.fixture().path("subdir");
    fs::create_dir(&dir).unwrap();

    let error = runner.expect_failure(&["-o", arg(&dir)]);
    assert!(error.is_not_found());
}

#[test]
fn test_empty_outfile() {
    let runner = CliTestRunner::new().unwrap();
    let out = runner.fixture().create_file("empty.dta", "").unwrap();

    // Hashes fine; an empty file is not a readable dataset
    let outcome = runner.expect_success(&["-o", arg(&out)]);
    assert!(outcome.entry.contains("    * BLAKE3 hash: af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262\n"));
    assert!(!outcome.entry.contains("## Varlists"));
}

#[cfg(unix)]
#[test]
fn test_unwritable_log_surfaces_io_error() {
    use std::os::unix::fs::PermissionsExt;

    let runner = CliTestRunner::new().unwrap();
    let out = runner.fixture().create_file("clean.csv", "id\n").unwrap();
    let log = runner.fixture().create_file("clean.log", "old\n").unwrap();
    fs::set_permissions(&log, fs::Permissions::from_mode(0o444)).unwrap();

    let result = runner.run_command(&["-o", arg(&out)]);
    fs::set_permissions(&log, fs::Permissions::from_mode(0o644)).unwrap();

    // Running as root ignores file permissions
    if let Err(error) = result {
        assert!(matches!(error, DdlogError::Io(_)), "got: {}", error);
        assert_eq!(fs::read_to_string(&log).unwrap(), "old\n");
    }
}
