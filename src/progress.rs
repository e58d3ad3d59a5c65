//! Progress reporting while hashing large data files

use indicatif::{ProgressBar, ProgressStyle};

/// Files smaller than this hash too quickly to be worth a progress bar
pub const PROGRESS_THRESHOLD: u64 = 64 * 1024 * 1024;

/// Progress reporter for digest computation; draws to stderr so stdout
/// only carries the confirmation message
#[derive(Debug)]
pub struct ProgressReporter {
    pub hash_pb: Option<ProgressBar>,
    show_progress: bool,
}

impl ProgressReporter {
    /// Reporter that shows a byte-count bar for files at or above the threshold
    pub fn new() -> Self {
        Self {
            hash_pb: None,
            show_progress: true,
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            hash_pb: None,
            show_progress: false,
        }
    }

    /// Start a bar for hashing a file of `total` bytes
    pub fn start_hash(&mut self, total: u64, message: &str) {
        self.finish_hash();
        if self.show_progress && total >= PROGRESS_THRESHOLD {
            self.hash_pb = Some(create_file_progress(total, message));
        }
    }

    /// Update hashed byte count
    pub fn update_hash(&self, processed: u64) {
        if let Some(pb) = &self.hash_pb {
            pb.set_position(processed);
        }
    }

    /// Finish the current hashing bar
    pub fn finish_hash(&mut self) {
        if let Some(pb) = self.hash_pb.take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish_hash();
    }
}

/// Create a simple progress bar for file operations
pub fn create_file_progress(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes:>7}/{total_bytes:7} {msg}")
            .expect("Invalid progress template")
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
