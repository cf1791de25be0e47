//! Package files and directory trees into ZIP archives.
//!
//! `treezip-core` walks a source directory, drops entries whose base name
//! matches an exclusion rule, and writes everything else into a ZIP archive
//! rooted under a folder named after the destination file. A single file
//! source becomes a one-entry archive.
//!
//! # Examples
//!
//! ```no_run
//! use treezip_core::PackConfig;
//! use treezip_core::pack_path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PackConfig::default()
//!     .with_destination_dir("dist")
//!     .with_destination_name("docs.zip");
//! let report = pack_path("docs", &config)?;
//! println!("Packed {} files", report.files_added);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod destination;
pub mod error;
pub mod exclusion;
pub mod packer;
pub mod report;
pub mod walker;
pub mod writer;

// Re-export main API types
pub use config::OutputMode;
pub use config::PackConfig;
pub use error::ErrorKind;
pub use error::PackError;
pub use error::Result;
pub use exclusion::DEFAULT_EXCLUSIONS;
pub use exclusion::ExclusionMode;
pub use exclusion::ExclusionSet;
pub use exclusion::SkipKind;
pub use packer::pack_directory;
pub use packer::pack_file;
pub use packer::pack_path;
pub use packer::pack_positional;
pub use report::PackReport;
