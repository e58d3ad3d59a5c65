//! Log file path resolution

use crate::error::{DdlogError, Result};
use std::path::{Path, PathBuf};

/// Extension given to derived log paths
pub const LOG_EXTENSION: &str = "log";

/// Resolve where the data delta log lives.
///
/// Without an explicit path the log sits next to the processed file, with
/// the extension replaced by `.log`; that file may not exist yet and is
/// created on first write. An explicit path must already exist: it is never
/// created, so a typo cannot silently start a fresh log.
pub fn resolve_log_path(outfile: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        None => {
            let derived = outfile.with_extension(LOG_EXTENSION);
            log::debug!("Derived log path: {}", derived.display());
            Ok(derived)
        }
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(path) => Err(DdlogError::file_not_found(path)),
    }
}
