//! The logging pipeline: hash, introspect, compare, format, write

use crate::change_detection::compare_varlists;
use crate::config::RunConfig;
use crate::data::FileDescriptor;
use crate::error::Result;
use crate::logfile::prepend_entry;
use crate::output::{timestamp_now, EntryContent, FileSummary, LogEntry};
use crate::progress::ProgressReporter;
use std::fs;
use std::path::{Path, PathBuf};

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub log_path: PathBuf,
    pub entry: String,
    /// False for dry runs
    pub written: bool,
}

/// Run the whole pipeline with the current local time
pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    let entry = build_entry(config, &timestamp_now())?.render();

    if config.dry_run {
        log::info!("Dry run, leaving {} untouched", config.log_path.display());
        return Ok(RunOutcome {
            log_path: config.log_path.clone(),
            entry,
            written: false,
        });
    }

    prepend_entry(&config.log_path, &entry)?;
    Ok(RunOutcome {
        log_path: config.log_path.clone(),
        entry,
        written: true,
    })
}

/// Build the entry for `config`, stamped with `timestamp`.
///
/// Reads every input but writes nothing; an error here leaves the log as it was.
pub fn build_entry(config: &RunConfig, timestamp: &str) -> Result<LogEntry> {
    let mut progress = if config.verbose {
        ProgressReporter::new()
    } else {
        ProgressReporter::new_minimal()
    };

    let processed = FileDescriptor::new(&config.outfile, config.hash);
    let raw = config
        .infile
        .as_ref()
        .map(|path| FileDescriptor::new(path, config.hash));

    hash_file(&processed, &mut progress)?;
    if let Some(raw) = &raw {
        hash_file(raw, &mut progress)?;
    }

    let comparison = compare_varlists(
        processed.variables(),
        raw.as_ref().and_then(|r| r.variables()),
    );
    if let Some(cmp) = &comparison {
        log::debug!(
            "Varlist comparison: {} common, {} processed only, {} raw only",
            cmp.common_count(),
            cmp.left_only_count(),
            cmp.right_only_count()
        );
    }

    let proclog = match &config.proclog {
        Some(path) => Some(read_proclog(path)?),
        None => None,
    };

    let content = EntryContent {
        timestamp: timestamp.to_string(),
        algorithm: config.hash,
        processed: summarize(&processed)?,
        raw: raw.as_ref().map(summarize).transpose()?,
        note: config.note.as_deref(),
        script: config.script.as_deref(),
        comparison: comparison.as_ref(),
        proclog: proclog.as_deref(),
    };
    Ok(LogEntry::from_content(&content))
}

fn hash_file(file: &FileDescriptor, progress: &mut ProgressReporter) -> Result<()> {
    progress.start_hash(file.size()?, &format!("Hashing {}", file.path().display()));
    file.digest_with_progress(|n| progress.update_hash(n))?;
    progress.finish_hash();
    Ok(())
}

/// Read a processing log; bytes that are not UTF-8 become U+FFFD
fn read_proclog(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn summarize(file: &FileDescriptor) -> Result<FileSummary<'_>> {
    Ok(FileSummary {
        path: file.path(),
        digest: file.digest()?,
        variables: file.variables(),
        header: file.header(),
    })
}
