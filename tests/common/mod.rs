//! Common test utilities and helpers

use ddlog::commands::{build_entry, run, RunOutcome};
use ddlog::output::LogEntry;
use ddlog::{DdlogError, Result, RunConfig};
use polars::prelude::DataFrame;
use polars_readstat_rs::StataWriter;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fixed timestamp used when checking exact entry text
pub const TEST_TIMESTAMP: &str = "2024-05-17 14:30";

/// Test fixture manager for creating temporary test environments
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the root path of the test fixture
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of `name` inside the fixture, without creating it
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Create a file with text content
    pub fn create_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        self.create_bytes(name, content.as_bytes())
    }

    /// Create a file with the given bytes
    pub fn create_bytes(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.path(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a corrupted file for testing error handling
    pub fn create_corrupted_file(&self, name: &str) -> Result<PathBuf> {
        self.create_bytes(name, b"\x00\x01\x02\x03invalid_data\xff\xfe")
    }

    /// Write a Stata dataset
    pub fn create_stata(&self, name: &str, df: &DataFrame) -> Result<PathBuf> {
        let path = self.path(name);
        StataWriter::new(&path)
            .write_df(df)
            .map_err(|e| DdlogError::invalid_input(format!("writing Stata fixture: {}", e)))?;
        Ok(path)
    }

    /// Read a file in the fixture back as text
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).expect("Should be able to read fixture file")
    }
}

/// Helper for running ddlog the way the binary does
pub struct CliTestRunner {
    fixture: TestFixture,
}

impl CliTestRunner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fixture: TestFixture::new()?,
        })
    }

    pub fn fixture(&self) -> &TestFixture {
        &self.fixture
    }

    /// Parse arguments into a validated configuration
    pub fn config(&self, args: &[&str]) -> Result<RunConfig> {
        use clap::Parser;
        use ddlog::cli::Cli;

        let mut cmd_args = vec!["ddlog"];
        cmd_args.extend(args);

        let cli = Cli::try_parse_from(cmd_args)
            .map_err(|e| DdlogError::invalid_input(e.to_string()))?;
        RunConfig::from_cli(cli)
    }

    /// Run ddlog and return the outcome
    pub fn run_command(&self, args: &[&str]) -> Result<RunOutcome> {
        run(&self.config(args)?)
    }

    /// Build the entry ddlog would write, with a fixed timestamp
    pub fn entry(&self, args: &[&str]) -> Result<LogEntry> {
        build_entry(&self.config(args)?, TEST_TIMESTAMP)
    }

    /// Run a command and expect it to succeed
    pub fn expect_success(&self, args: &[&str]) -> RunOutcome {
        self.run_command(args).expect("Command should succeed")
    }

    /// Run a command and expect it to fail
    pub fn expect_failure(&self, args: &[&str]) -> DdlogError {
        self.run_command(args).expect_err("Command should fail")
    }
}

/// Path as a `&str` argument
pub fn arg(path: &Path) -> &str {
    path.to_str().expect("Test paths should be UTF-8")
}

/// Sample datasets
pub mod sample_data {
    use polars::df;
    use polars::prelude::DataFrame;

    /// Processed dataset with variables a, b, c
    pub fn processed_abc() -> DataFrame {
        df!(
            "a" => [1i32, 2, 3],
            "b" => [10i32, 20, 30],
            "c" => ["x", "y", "z"]
        )
        .unwrap()
    }

    /// Raw dataset with variables b, c, d
    pub fn raw_bcd() -> DataFrame {
        df!(
            "b" => [10i32, 20, 30],
            "c" => ["x", "y", "z"],
            "d" => [0.5f64, 1.5, 2.5]
        )
        .unwrap()
    }

    /// Same variables as `processed_abc`, different values
    pub fn processed_abc_revised() -> DataFrame {
        df!(
            "a" => [1i32, 2, 4],
            "b" => [10i32, 20, 40],
            "c" => ["x", "y", "w"]
        )
        .unwrap()
    }
}

/// Assertion helpers for test validation
pub mod assertions {
    use std::path::Path;

    /// Assert that a file exists and is not empty
    pub fn assert_file_exists_and_not_empty(path: &Path) {
        assert!(path.exists(), "File should exist: {}", path.display());
        let metadata = std::fs::metadata(path).expect("Should be able to read file metadata");
        assert!(metadata.len() > 0, "File should not be empty: {}", path.display());
    }

    /// Assert that `needle` occurs exactly `times` times in `haystack`
    pub fn assert_occurs(haystack: &str, needle: &str, times: usize) {
        let found = haystack.matches(needle).count();
        assert_eq!(found, times, "Expected {:?} {} time(s) in:\n{}", needle, times, haystack);
    }
}
