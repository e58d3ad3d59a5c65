//! Unit tests for CLI argument parsing and validation

use clap::error::ErrorKind;
use clap::Parser;
use ddlog::cli::Cli;
use ddlog::hash::HashAlgorithm;
use std::path::PathBuf;

#[test]
fn test_cli_minimal() {
    let cli = Cli::try_parse_from(["ddlog", "--outfile", "clean.sas7bdat"]).unwrap();
    assert_eq!(cli.outfile, PathBuf::from("clean.sas7bdat"));
    assert!(cli.infile.is_none());
    assert!(cli.script.is_none());
    assert!(cli.proclog.is_none());
    assert!(cli.logpath.is_none());
    assert!(cli.note.is_none());
    assert!(!cli.verbose);
    assert!(!cli.dry_run);
    assert_eq!(cli.hash, HashAlgorithm::Blake3);
}

#[test]
fn test_cli_long_flags() {
    let cli = Cli::try_parse_from([
        "ddlog",
        "--outfile",
        "out.dta",
        "--infile",
        "raw.dta",
        "--script",
        "stata -b do clean.do",
        "--proclog",
        "clean.log",
        "--logpath",
        "history.md",
        "--note",
        "We used the wrong data last time.",
        "--verbose",
        "--dry-run",
    ])
    .unwrap();

    assert_eq!(cli.infile, Some(PathBuf::from("raw.dta")));
    assert_eq!(cli.script.as_deref(), Some("stata -b do clean.do"));
    assert_eq!(cli.proclog, Some(PathBuf::from("clean.log")));
    assert_eq!(cli.logpath, Some(PathBuf::from("history.md")));
    assert_eq!(cli.note.as_deref(), Some("We used the wrong data last time."));
    assert!(cli.verbose);
    assert!(cli.dry_run);
}

#[test]
fn test_cli_missing_outfile() {
    let err = Cli::try_parse_from(["ddlog", "--infile", "raw.dta"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_cli_unknown_flag() {
    let err = Cli::try_parse_from(["ddlog", "-o", "out.dta", "--append"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
}

#[test]
fn test_cli_flag_without_value() {
    assert!(Cli::try_parse_from(["ddlog", "-o", "out.dta", "-n"]).is_err());
}

#[test]
fn test_cli_help_is_not_a_failure() {
    let err = Cli::try_parse_from(["ddlog", "--help"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    assert_eq!(err.exit_code(), 0);
}

#[test]
fn test_cli_sha256() {
    let cli = Cli::try_parse_from(["ddlog", "-o", "out.dta", "--hash", "sha256"]).unwrap();
    assert_eq!(cli.hash, HashAlgorithm::Sha256);
}
