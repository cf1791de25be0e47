//! Packaging operation reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of a packaging operation.
///
/// # Examples
///
/// ```
/// use treezip_core::PackReport;
///
/// let mut report = PackReport::default();
/// report.bytes_read = 1000;
/// report.bytes_compressed = 250;
///
/// assert_eq!(report.compression_ratio(), 4.0);
/// assert_eq!(report.compression_percentage(), 75.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackReport {
    /// Absolute path of the written archive.
    pub output_path: PathBuf,

    /// Root folder prefix used for entry names (`None` for single files or
    /// an empty derived root).
    pub root_name: Option<String>,

    /// Number of file entries written.
    pub files_added: usize,

    /// Number of directory markers written.
    pub directories_added: usize,

    /// Names of entries left out by exclusion rules.
    ///
    /// Pruned directories are listed once; their descendants are not.
    pub skipped: Vec<String>,

    /// Uncompressed bytes copied from source files.
    pub bytes_read: u64,

    /// Size of the finished archive.
    pub bytes_compressed: u64,

    /// Whether an existing archive at the destination was replaced.
    pub replaced_existing: bool,

    /// Duration of the operation.
    pub duration: Duration,

    /// Warnings generated while packaging.
    pub warnings: Vec<String>,
}

impl PackReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries in the archive.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.directories_added
    }

    /// Number of excluded entries.
    #[must_use]
    pub fn entries_skipped(&self) -> usize {
        self.skipped.len()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the compression ratio (uncompressed / compressed).
    ///
    /// Returns 0.0 if either size is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.bytes_compressed as f64
    }

    /// Returns the space saved as a percentage of the uncompressed size.
    ///
    /// Negative when container overhead outweighs compression (tiny inputs).
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_read == 0 {
            return 0.0;
        }
        (1.0 - self.bytes_compressed as f64 / self.bytes_read as f64) * 100.0
    }
}
