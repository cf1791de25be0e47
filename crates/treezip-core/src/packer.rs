//! Packaging entry points.
//!
//! [`pack_path`] inspects the source and dispatches to [`pack_directory`] or
//! [`pack_file`]. Both resolve the destination, remove any archive already at
//! that path, write every entry through [`EntryWriter`], and put the finished
//! archive on disk in a single final step.

use crate::PackError;
use crate::Result;
use crate::config::OutputMode;
use crate::config::PackConfig;
use crate::destination::Destination;
use crate::destination::absolutize;
use crate::destination::base_name;
use crate::report::PackReport;
use crate::walker::EntryKind;
use crate::walker::FilteredWalker;
use crate::walker::SkipReason;
use crate::walker::WalkItem;
use crate::writer::EntryWriter;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Cursor;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

/// Packages a file or directory into a ZIP archive.
///
/// Directories are packaged recursively under a root folder named after the
/// destination file; any other source becomes a one-entry archive and the
/// configured exclusions are ignored.
///
/// # Examples
///
/// ```no_run
/// use treezip_core::PackConfig;
/// use treezip_core::pack_path;
///
/// let config = PackConfig::default().with_destination_name("site.zip");
/// let report = pack_path("public", &config)?;
/// println!("wrote {} entries to {}", report.total_entries(), report.output_path.display());
/// # Ok::<(), treezip_core::PackError>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The source does not exist or cannot be accessed
/// - The configuration is invalid
/// - Any source read, archive write, or directory walk fails
pub fn pack_path<P: AsRef<Path>>(source: P, config: &PackConfig) -> Result<PackReport> {
    let source = source.as_ref();
    config.validate()?;

    let metadata = fs::metadata(source).map_err(|e| {
        tracing::error!("cannot stat {}: {e}", source.display());
        PackError::from_access(source, e)
    })?;

    if metadata.is_dir() {
        pack_tree(source, config)
    } else {
        pack_single(source, config)
    }
}

/// Packages using the positional argument convention.
///
/// `args` are, in order: destination directory, destination file name, and
/// any number of file names to exclude. Extra names replace the default
/// exclusions rather than adding to them.
///
/// # Examples
///
/// ```no_run
/// use treezip_core::pack_positional;
///
/// // ./test packaged to ./tname.tar.zip under the root folder `tname`
/// pack_positional("test", &[".", "tname.tar.zip"])?;
/// # Ok::<(), treezip_core::PackError>(())
/// ```
pub fn pack_positional<P: AsRef<Path>, S: AsRef<str>>(source: P, args: &[S]) -> Result<PackReport> {
    pack_path(source, &PackConfig::from_positional(args))
}

/// Packages a directory tree.
///
/// Every entry is named `<root>/<relative path>`, where `<root>` is the
/// destination file name up to its first `.` unless
/// [`PackConfig::root_name`] overrides it.
pub fn pack_directory<P: AsRef<Path>>(source: P, config: &PackConfig) -> Result<PackReport> {
    config.validate()?;
    pack_tree(source.as_ref(), config)
}

/// Packages a single file as a one-entry archive named by its base name.
pub fn pack_file<P: AsRef<Path>>(source: P, config: &PackConfig) -> Result<PackReport> {
    config.validate()?;
    pack_single(source.as_ref(), config)
}

fn pack_tree(source: &Path, config: &PackConfig) -> Result<PackReport> {
    let start = Instant::now();

    let source = absolutize(source)?;
    let dest = resolve_destination(&source, config)?;
    let root_name = config
        .root_name
        .clone()
        .unwrap_or_else(|| dest.root_name().to_string());
    let exclusions = config.exclusion_set();

    tracing::debug!(
        source = %source.display(),
        output = %dest.path().display(),
        root = %root_name,
        exclusions = exclusions.len(),
        "packaging directory"
    );

    let mut report = PackReport {
        output_path: dest.path().to_path_buf(),
        root_name: (!root_name.is_empty()).then(|| root_name.clone()),
        ..PackReport::default()
    };
    report.replaced_existing = remove_existing(dest.path())?;

    let walker = FilteredWalker::new(&source, &root_name, &exclusions)
        .follow_symlinks(config.follow_symlinks)
        .sort_entries(config.sort_entries)
        .ignore_path(dest.path())
        .ignore_path(dest.staging_path());

    write_archive(&dest, config, Contents::Tree(walker), &mut report)?;

    report.duration = start.elapsed();
    tracing::debug!(
        files = report.files_added,
        directories = report.directories_added,
        skipped = report.entries_skipped(),
        "archive written"
    );
    Ok(report)
}

fn pack_single(source: &Path, config: &PackConfig) -> Result<PackReport> {
    let start = Instant::now();

    let source = absolutize(source)?;
    let dest = resolve_destination(&source, config)?;
    if dest.path() == source {
        return Err(PackError::InvalidDestination {
            path: dest.path().to_path_buf(),
        });
    }

    if !config.exclusions.is_empty() || !config.excluded_dirs.is_empty() {
        tracing::debug!("exclusions do not apply to single-file archives");
    }

    let name = base_name(&source)?.to_string();
    tracing::info!("visiting {name}");

    let mut report = PackReport {
        output_path: dest.path().to_path_buf(),
        ..PackReport::default()
    };
    report.replaced_existing = remove_existing(dest.path())?;

    write_archive(
        &dest,
        config,
        Contents::File {
            path: source,
            name,
        },
        &mut report,
    )?;

    report.duration = start.elapsed();
    Ok(report)
}

enum Contents<'a> {
    Tree(FilteredWalker<'a>),
    File { path: PathBuf, name: String },
}

fn resolve_destination(source: &Path, config: &PackConfig) -> Result<Destination> {
    Destination::resolve(
        source,
        config.destination_dir.as_deref(),
        config.destination_name.as_deref(),
    )
}

/// Deletes a file at `path`, returning whether one existed.
fn remove_existing(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Err(PackError::DestinationIsDirectory {
            path: path.to_path_buf(),
        }),
        Ok(_) => {
            tracing::debug!("removing existing archive {}", path.display());
            fs::remove_file(path).map_err(|e| PackError::WriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PackError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn write_archive(
    dest: &Destination,
    config: &PackConfig,
    contents: Contents<'_>,
    report: &mut PackReport,
) -> Result<()> {
    let level = config.compression_level;
    let write_failed = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| PackError::WriteFailed { path, source }
    };

    match config.output_mode {
        OutputMode::InMemory => {
            let mut writer = EntryWriter::new(Cursor::new(Vec::new()), level);
            write_entries(&mut writer, contents, report)?;
            let bytes = writer.finish()?.into_inner();

            fs::write(dest.path(), &bytes).map_err(write_failed(dest.path()))?;
            report.bytes_compressed = bytes.len() as u64;
        }
        OutputMode::Streaming => {
            let staging = dest.staging_path();
            let file = File::create(&staging).map_err(write_failed(staging.as_path()))?;

            if let Err(err) = stream_entries(file, level, contents, report) {
                discard_staged(&staging);
                return Err(err);
            }

            commit_staged(&staging, dest.path())?;
            report.bytes_compressed = fs::metadata(dest.path())
                .map_err(write_failed(dest.path()))?
                .len();
        }
    }

    Ok(())
}

/// Moves a finished staging file into place, removing it if the move fails.
fn commit_staged(staging: &Path, dest: &Path) -> Result<()> {
    if let Err(source) = fs::rename(staging, dest) {
        discard_staged(staging);
        return Err(PackError::WriteFailed {
            path: dest.to_path_buf(),
            source,
        });
    }
    Ok(())
}

fn discard_staged(staging: &Path) {
    if let Err(cleanup) = fs::remove_file(staging) {
        tracing::warn!("cannot remove {}: {cleanup}", staging.display());
    }
}

fn stream_entries(
    file: File,
    level: Option<u8>,
    contents: Contents<'_>,
    report: &mut PackReport,
) -> Result<()> {
    let mut writer = EntryWriter::new(BufWriter::new(file), level);
    write_entries(&mut writer, contents, report)?;
    let mut sink = writer.finish()?;
    sink.flush()?;
    Ok(())
}

fn write_entries<W: Write + Seek>(
    writer: &mut EntryWriter<W>,
    contents: Contents<'_>,
    report: &mut PackReport,
) -> Result<()> {
    match contents {
        Contents::File { path, name } => writer.add_file(&name, &path, report),
        Contents::Tree(walker) => {
            for item in walker.walk() {
                match item? {
                    WalkItem::Entry(entry) => match entry.kind {
                        // an empty root name leaves nothing to mark for the root
                        EntryKind::Directory if entry.archive_name.is_empty() => {}
                        EntryKind::Directory => writer.add_directory(&entry.archive_name, report)?,
                        EntryKind::File => {
                            writer.add_file(&entry.archive_name, &entry.path, report)?;
                        }
                    },
                    WalkItem::Skipped(skipped) => match skipped.reason {
                        SkipReason::Excluded(_) => report.skipped.push(skipped.archive_name),
                        SkipReason::Symlink => report.add_warning(format!(
                            "skipped symlink: {}",
                            skipped.path.display()
                        )),
                        SkipReason::Special => report.add_warning(format!(
                            "skipped special file: {}",
                            skipped.path.display()
                        )),
                    },
                }
            }
            Ok(())
        }
    }
}
