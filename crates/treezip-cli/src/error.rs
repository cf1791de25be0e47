//! Error conversion utilities for CLI.
//!
//! Converts treezip-core's typed errors (thiserror) into user-facing
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use treezip_core::PackError;

/// Converts a `PackError` into an anyhow error with a hint where one helps.
pub fn convert_pack_error(err: PackError, source: &Path) -> anyhow::Error {
    match err {
        PackError::SourceNotFound { path } => {
            anyhow!(
                "Source not found: {}\n\
                 HINT: Check the path; it must name an existing file or directory.",
                path.display()
            )
        }
        PackError::PermissionDenied { path } => {
            anyhow!(
                "Permission denied while packaging '{}': {}\n\
                 HINT: Exclude the unreadable entry with --exclude or --exclude-dir.",
                source.display(),
                path.display()
            )
        }
        PackError::DestinationIsDirectory { path } => {
            anyhow!(
                "Destination is a directory: {}\n\
                 HINT: Pass an archive name as DEST_NAME, for example '{}.zip'.",
                path.display(),
                source
                    .file_name()
                    .map_or_else(|| "archive".into(), |n| n.to_string_lossy())
            )
        }
        PackError::InvalidDestination { path } => {
            anyhow!(
                "Cannot derive an archive name from '{}'\n\
                 HINT: Pass DEST_NAME explicitly, or choose a destination other than the source.",
                path.display()
            )
        }
        PackError::WriteFailed { path, source: io_err } => {
            anyhow!(
                "Failed to write archive '{}': {}\n\
                 HINT: Check that DEST_DIR exists and is writable.",
                path.display(),
                io_err
            )
        }
        PackError::NonUtf8Path { path } => {
            anyhow!(
                "Path is not valid UTF-8: {}\n\
                 HINT: Rename the entry or exclude it with --exclude.",
                path.display()
            )
        }
        PackError::Io(io_err) => {
            anyhow!(
                "I/O error while packaging '{}': {}",
                source.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err).context(format!("Error packaging '{}'", source.display())),
    }
}

/// Maps a core result into an anyhow result carrying the source path.
pub fn add_source_context<T>(result: Result<T, PackError>, source: &Path) -> anyhow::Result<T> {
    result.map_err(|e| convert_pack_error(e, source))
}
