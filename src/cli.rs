//! Command-line interface for ddlog

use crate::hash::HashAlgorithm;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ddlog")]
#[command(about = "Data delta log: generate a log update when data are created or changed")]
#[command(version)]
pub struct Cli {
    /// Processed data file path; the only required argument
    #[arg(short, long)]
    pub outfile: PathBuf,

    /// Raw data file path; SAS, Stata or SPSS files enable varlist comparisons
    #[arg(short, long)]
    pub infile: Option<PathBuf>,

    /// Processing script command; printed in the log for reference, not executed
    #[arg(short, long)]
    pub script: Option<String>,

    /// Processing log file path; its contents are embedded at the end of the entry
    #[arg(short, long)]
    pub proclog: Option<PathBuf>,

    /// Path for the data delta log; must already exist. Defaults to the
    /// processed file path with its extension changed to 'log'
    #[arg(short, long)]
    pub logpath: Option<PathBuf>,

    /// Free-text note recorded with the entry
    #[arg(short, long)]
    pub note: Option<String>,

    /// Digest algorithm used to fingerprint the data files
    #[arg(long, value_enum, default_value_t = HashAlgorithm::Blake3)]
    pub hash: HashAlgorithm,

    /// Print the entry to stdout instead of writing the log
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
