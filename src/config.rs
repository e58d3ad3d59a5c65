//! Validated run configuration

use crate::cli::Cli;
use crate::error::{DdlogError, Result};
use crate::hash::HashAlgorithm;
use crate::resolver::resolve_log_path;
use std::path::{Path, PathBuf};

/// Configuration for one invocation, built once from the command line.
///
/// Every referenced input file has been checked to exist and the log path
/// has been resolved, so later stages only fail on I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub outfile: PathBuf,
    pub infile: Option<PathBuf>,
    pub script: Option<String>,
    pub proclog: Option<PathBuf>,
    pub log_path: PathBuf,
    pub note: Option<String>,
    pub hash: HashAlgorithm,
    pub dry_run: bool,
    pub verbose: bool,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        require_file(&cli.outfile)?;
        if let Some(infile) = &cli.infile {
            require_file(infile)?;
        }
        if let Some(proclog) = &cli.proclog {
            require_file(proclog)?;
        }
        let log_path = resolve_log_path(&cli.outfile, cli.logpath.as_deref())?;
        if same_file(&log_path, &cli.outfile) {
            return Err(DdlogError::invalid_input(format!(
                "Log path {} is the processed file itself",
                log_path.display()
            )));
        }

        let config = Self {
            outfile: cli.outfile,
            infile: cli.infile,
            script: non_empty(cli.script),
            proclog: cli.proclog,
            log_path,
            note: non_empty(cli.note),
            hash: cli.hash,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        };
        log::debug!("Run configuration: {:?}", config);
        Ok(config)
    }
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DdlogError::file_not_found(path))
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
