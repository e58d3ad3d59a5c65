//! # ddlog
//!
//! Data delta log: whenever a data file is created or changed, record an
//! entry with the file's digest, the variables it gained or lost relative
//! to its raw input, dataset headers and the processing log.

pub mod cli;
pub mod error;
pub mod config;
pub mod resolver;
pub mod hash;
pub mod data;
pub mod change_detection;
pub mod output;
pub mod logfile;
pub mod progress;
pub mod commands;

pub use error::{DdlogError, Result};
pub use config::RunConfig;
pub use resolver::resolve_log_path;
pub use change_detection::{compare_varlists, VariableListComparison};
pub use data::{read_variables, FileDescriptor, FormatInfo};
pub use output::LogEntry;
