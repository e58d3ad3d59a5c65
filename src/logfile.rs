//! Writing entries into the data delta log
//!
//! Entries are prepended: the newest entry is always at the top of the file
//! and earlier entries are carried over byte for byte. The new log is written
//! to a temporary file beside the old one and renamed over it, so a failed
//! write leaves the previous log intact. There is no locking, so two
//! concurrent runs against the same log may lose an entry.

use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Message printed after a successful write
pub const LOG_UPDATED: &str = "Log updated";

/// Write `entry` at the top of the log at `log_path`.
///
/// A log that does not exist yet is treated as empty and created.
pub fn prepend_entry(log_path: &Path, entry: &str) -> Result<()> {
    let old = match fs::read(log_path) {
        Ok(bytes) => {
            // The rename below would replace a read-only log
            OpenOptions::new().append(true).open(log_path)?;
            Some(bytes)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("Starting new log at {}", log_path.display());
            None
        }
        Err(e) => return Err(e.into()),
    };

    let dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(entry.as_bytes())?;
    if let Some(old) = &old {
        tmp.write_all(old)?;
    }
    tmp.as_file().sync_all()?;

    if old.is_some() {
        let permissions = fs::metadata(log_path)?.permissions();
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.persist(log_path).map_err(|e| e.error)?;

    log::debug!(
        "Wrote {} bytes ahead of {} existing bytes in {}",
        entry.len(),
        old.as_ref().map_or(0, Vec::len),
        log_path.display()
    );
    Ok(())
}
