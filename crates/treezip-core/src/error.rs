//! Error types for packaging operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Coarse classification of a [`PackError`].
///
/// Lets embedding applications decide whether to abort, retry, or report
/// without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source path does not exist.
    SourceNotFound,
    /// A filesystem object could not be accessed.
    PermissionDenied,
    /// Writing the archive or its destination failed.
    WriteFailed,
    /// The directory walk or a source read failed.
    WalkError,
    /// The packaging configuration is invalid.
    Config,
}

/// Errors that can occur while packaging a file or directory tree.
#[derive(Error, Debug)]
pub enum PackError {
    /// Source path does not exist.
    #[error("source path not found: {path}")]
    SourceNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// A filesystem object could not be accessed.
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// Path that could not be accessed.
        path: PathBuf,
    },

    /// Reading a source file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Source file being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing or removing the destination failed.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("walk error at {path}: {message}")]
    Walk {
        /// Path where traversal failed.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// The ZIP writer rejected an entry or failed to finish the archive.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Destination path is an existing directory.
    #[error("destination is a directory: {path}")]
    DestinationIsDirectory {
        /// Resolved destination path.
        path: PathBuf,
    },

    /// Destination (or source) path has no usable file name.
    #[error("cannot derive a file name from {path}")]
    InvalidDestination {
        /// Offending path.
        path: PathBuf,
    },

    /// Entry path cannot be represented in a ZIP entry name.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Offending path.
        path: PathBuf,
    },

    /// Compression level outside 0-9.
    #[error("invalid compression level {level}, expected 0-9")]
    InvalidCompressionLevel {
        /// Rejected level.
        level: u8,
    },

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PackError {
    /// Returns the coarse category of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use treezip_core::ErrorKind;
    /// use treezip_core::PackError;
    /// use std::path::PathBuf;
    ///
    /// let err = PackError::SourceNotFound {
    ///     path: PathBuf::from("missing"),
    /// };
    /// assert_eq!(err.kind(), ErrorKind::SourceNotFound);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::WriteFailed { .. } | Self::Archive(_) | Self::DestinationIsDirectory { .. } => {
                ErrorKind::WriteFailed
            }
            Self::Read { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => {
                ErrorKind::PermissionDenied
            }
            Self::Read { .. } | Self::Walk { .. } | Self::NonUtf8Path { .. } => {
                ErrorKind::WalkError
            }
            Self::InvalidDestination { .. } | Self::InvalidCompressionLevel { .. } => {
                ErrorKind::Config
            }
            Self::Io(err) => match err.kind() {
                std::io::ErrorKind::NotFound => ErrorKind::SourceNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
                _ => ErrorKind::WriteFailed,
            },
        }
    }

    /// Maps a metadata or open failure on `path` to the matching variant.
    pub(crate) fn from_access(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::SourceNotFound { path: path.into() },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path: path.into() },
            _ => Self::Read {
                path: path.into(),
                source: err,
            },
        }
    }

    /// Converts a `walkdir` failure, keeping permission errors distinguishable.
    pub(crate) fn from_walk(root: &std::path::Path, err: &walkdir::Error) -> Self {
        let path = err.path().map_or_else(|| root.to_path_buf(), PathBuf::from);
        if err
            .io_error()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::PermissionDenied)
        {
            return Self::PermissionDenied { path };
        }
        Self::Walk {
            path,
            message: err.to_string(),
        }
    }
}
