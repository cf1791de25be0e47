//! Directory tree walking with name-based exclusion.
//!
//! The walk is depth-first in platform directory order unless sorting is
//! requested. Excluded directories are pruned without visiting their
//! descendants; excluded files are dropped while the walk continues.

use crate::PackError;
use crate::Result;
use crate::exclusion::ExclusionSet;
use crate::exclusion::SkipKind;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Kind of entry written to the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file, written with its full content.
    File,
    /// Directory, written as a zero-length marker ending in `/`.
    Directory,
}

/// Why a visited object was left out of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Base name matched an exclusion rule.
    Excluded(SkipKind),
    /// Symlink to a directory, or a dangling link, encountered while not
    /// following links.
    Symlink,
    /// Socket, FIFO, device or other non-regular file.
    Special,
}

/// An entry that passed every rule and belongs in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackEntry {
    /// Absolute filesystem path.
    pub path: PathBuf,
    /// Entry name inside the archive, `/`-separated, without the trailing
    /// `/` for directories.
    pub archive_name: String,
    /// File or directory.
    pub kind: EntryKind,
}

/// A visited object that was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Absolute filesystem path.
    pub path: PathBuf,
    /// Name the entry would have had inside the archive.
    pub archive_name: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// One step of the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkItem {
    /// Entry to add.
    Entry(PackEntry),
    /// Entry that was left out.
    Skipped(SkippedEntry),
}

/// Walks a directory tree applying an [`ExclusionSet`].
///
/// # Examples
///
/// ```no_run
/// use treezip_core::ExclusionSet;
/// use treezip_core::walker::FilteredWalker;
/// use treezip_core::walker::WalkItem;
/// use std::path::Path;
///
/// let exclusions = ExclusionSet::default();
/// let walker = FilteredWalker::new(Path::new("/srv/site"), "site", &exclusions);
///
/// for item in walker.walk() {
///     if let WalkItem::Entry(entry) = item? {
///         println!("would add {}", entry.archive_name);
///     }
/// }
/// # Ok::<(), treezip_core::PackError>(())
/// ```
#[derive(Debug)]
pub struct FilteredWalker<'a> {
    root: &'a Path,
    prefix: &'a str,
    exclusions: &'a ExclusionSet,
    follow_symlinks: bool,
    sort_entries: bool,
    ignored: Vec<PathBuf>,
}

impl<'a> FilteredWalker<'a> {
    /// Creates a walker over `root`, naming entries `<prefix>/<relative>`.
    ///
    /// An empty prefix names entries by their relative path alone.
    #[must_use]
    pub fn new(root: &'a Path, prefix: &'a str, exclusions: &'a ExclusionSet) -> Self {
        Self {
            root,
            prefix,
            exclusions,
            follow_symlinks: false,
            sort_entries: false,
            ignored: Vec::new(),
        }
    }

    /// Follows every symlink, descending into linked directories.
    ///
    /// Without this, links to regular files are archived with the target's
    /// content and all other links are reported as skipped.
    #[must_use]
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Visits siblings in file-name order.
    #[must_use]
    pub fn sort_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    /// Silently drops `path` if the walk reaches it.
    ///
    /// Used for the archive being written when it lives inside the tree.
    #[must_use]
    pub fn ignore_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignored.push(path.into());
        self
    }

    /// Returns an iterator over the walk.
    ///
    /// # Errors
    ///
    /// Items are errors if:
    /// - A directory cannot be read
    /// - Entry metadata cannot be read
    /// - A relative path is not valid UTF-8; this aborts the whole walk
    ///   since ZIP entry names are written as UTF-8
    pub fn walk(self) -> Walk<'a> {
        let mut walkdir = WalkDir::new(self.root).follow_links(self.follow_symlinks);
        if self.sort_entries {
            walkdir = walkdir.sort_by_file_name();
        }

        Walk {
            inner: walkdir.into_iter(),
            walker: self,
        }
    }
}

/// Iterator returned by [`FilteredWalker::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    inner: walkdir::IntoIter,
    walker: FilteredWalker<'a>,
}

impl Iterator for Walk<'_> {
    type Item = Result<WalkItem>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(PackError::from_walk(self.walker.root, &err))),
            };

            if self.walker.ignored.iter().any(|p| p == entry.path()) {
                tracing::debug!(path = %entry.path().display(), "ignoring output archive");
                continue;
            }

            return Some(self.classify(&entry));
        }
    }
}

impl Walk<'_> {
    fn classify(&mut self, entry: &walkdir::DirEntry) -> Result<WalkItem> {
        let path = entry.path().to_path_buf();
        let archive_name = archive_name(self.walker.root, &path, self.walker.prefix)?;
        let file_type = entry.file_type();

        tracing::info!("visiting {archive_name}");

        // the packaged root is never excluded
        let is_root = entry.depth() == 0;

        let (kind, skip) = if file_type.is_dir() {
            (EntryKind::Directory, SkipKind::Directory)
        } else if file_type.is_file() || links_to_file(entry) {
            (EntryKind::File, SkipKind::File)
        } else {
            let reason = if file_type.is_symlink() {
                SkipReason::Symlink
            } else {
                SkipReason::Special
            };
            tracing::info!("skipping {archive_name} ({reason:?})");
            return Ok(WalkItem::Skipped(SkippedEntry {
                path,
                archive_name,
                reason,
            }));
        };

        if !is_root && self.walker.exclusions.matches(&path, skip) {
            if kind == EntryKind::Directory {
                self.inner.skip_current_dir();
            }
            tracing::info!("skipping {}", entry.file_name().to_string_lossy());
            return Ok(WalkItem::Skipped(SkippedEntry {
                path,
                archive_name,
                reason: SkipReason::Excluded(skip),
            }));
        }

        Ok(WalkItem::Entry(PackEntry {
            path,
            archive_name,
            kind,
        }))
    }
}

fn links_to_file(entry: &walkdir::DirEntry) -> bool {
    entry.path_is_symlink() && std::fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file())
}

/// Builds the `/`-separated archive name for `path` below `root`.
///
/// The root itself maps to the prefix alone, which is empty when no prefix
/// is used.
///
/// # Examples
///
/// ```
/// use treezip_core::walker::archive_name;
/// use std::path::Path;
///
/// let name = archive_name(Path::new("/data/test"), Path::new("/data/test/a/b.txt"), "tname")?;
/// assert_eq!(name, "tname/a/b.txt");
/// # Ok::<(), treezip_core::PackError>(())
/// ```
pub fn archive_name(root: &Path, path: &Path, prefix: &str) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| PackError::Walk {
        path: path.to_path_buf(),
        message: format!("entry escaped walk root {}", root.display()),
    })?;

    let mut segments: Vec<&str> = Vec::new();
    if !prefix.is_empty() {
        segments.push(prefix);
    }
    for component in relative.components() {
        if let Component::Normal(part) = component {
            segments.push(part.to_str().ok_or_else(|| PackError::NonUtf8Path {
                path: path.to_path_buf(),
            })?);
        }
    }

    Ok(segments.join("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn collect(walker: FilteredWalker<'_>) -> (Vec<PackEntry>, Vec<SkippedEntry>) {
        let mut entries = Vec::new();
        let mut skipped = Vec::new();
        for item in walker.walk() {
            match item.unwrap() {
                WalkItem::Entry(entry) => entries.push(entry),
                WalkItem::Skipped(entry) => skipped.push(entry),
            }
        }
        (entries, skipped)
    }

    fn names(entries: &[PackEntry]) -> Vec<&str> {
        let mut names: Vec<_> = entries.iter().map(|e| e.archive_name.as_str()).collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn test_walker_basic_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("file1.txt"), "content1").unwrap();
        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/file2.txt"), "content2").unwrap();

        let exclusions = ExclusionSet::default();
        let (entries, skipped) = collect(FilteredWalker::new(root, "pkg", &exclusions));

        assert_eq!(
            names(&entries),
            vec!["pkg", "pkg/file1.txt", "pkg/subdir", "pkg/subdir/file2.txt"]
        );
        assert!(skipped.is_empty());

        let root_entry = entries.iter().find(|e| e.archive_name == "pkg").unwrap();
        assert_eq!(root_entry.kind, EntryKind::Directory);
    }

    #[test]
    fn test_walker_without_prefix() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("file.txt"), "x").unwrap();

        let exclusions = ExclusionSet::default();
        let (entries, _) = collect(FilteredWalker::new(temp.path(), "", &exclusions));

        assert_eq!(names(&entries), vec!["", "file.txt"]);
    }

    #[test]
    fn test_walker_skips_default_exclusions() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("b")).unwrap();
        fs::write(root.join("b/b.txt"), "b\n").unwrap();
        fs::write(root.join("b/.DS_Store"), "b\n").unwrap();
        fs::write(root.join("b/thumbs.db"), "b\n").unwrap();

        let exclusions = ExclusionSet::default();
        let (entries, skipped) = collect(FilteredWalker::new(root, "t", &exclusions));

        assert_eq!(names(&entries), vec!["t", "t/b", "t/b/b.txt"]);
        assert_eq!(skipped.len(), 2);
        assert!(
            skipped
                .iter()
                .all(|s| s.reason == SkipReason::Excluded(SkipKind::File))
        );
    }

    #[test]
    fn test_walker_prunes_excluded_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("keep/target/deep")).unwrap();
        fs::write(root.join("keep/target/deep/x.o"), "obj").unwrap();
        fs::write(root.join("keep/main.rs"), "fn main() {}").unwrap();

        let exclusions = ExclusionSet::empty().with_dir("target");
        let (entries, skipped) = collect(FilteredWalker::new(root, "p", &exclusions));

        assert_eq!(names(&entries), vec!["p", "p/keep", "p/keep/main.rs"]);
        assert_eq!(skipped.len(), 1, "descendants of a pruned dir are never visited");
        assert_eq!(skipped[0].archive_name, "p/keep/target");
    }

    #[test]
    fn test_file_rule_does_not_prune_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("cache")).unwrap();
        fs::write(root.join("cache/data"), "d").unwrap();

        let exclusions = ExclusionSet::empty().with_file("cache");
        let (entries, skipped) = collect(FilteredWalker::new(root, "p", &exclusions));

        assert_eq!(names(&entries), vec!["p", "p/cache", "p/cache/data"]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_root_is_never_excluded() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("target");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();

        let exclusions = ExclusionSet::empty().with_dir("target");
        let (entries, _) = collect(FilteredWalker::new(&root, "target", &exclusions));

        assert_eq!(names(&entries), vec!["target", "target/a.txt"]);
    }

    #[test]
    fn test_ignored_path_is_dropped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("data.txt"), "d").unwrap();
        fs::write(root.join("out.zip"), "old").unwrap();

        let exclusions = ExclusionSet::default();
        let walker = FilteredWalker::new(root, "p", &exclusions).ignore_path(root.join("out.zip"));
        let (entries, skipped) = collect(walker);

        assert_eq!(names(&entries), vec!["p", "p/data.txt"]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_sorted_walk_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for name in ["c.txt", "a.txt", "b.txt"] {
            fs::write(root.join(name), name).unwrap();
        }

        let exclusions = ExclusionSet::default();
        let walker = FilteredWalker::new(root, "p", &exclusions).sort_entries(true);
        let (entries, _) = collect(walker);
        let order: Vec<_> = entries.iter().map(|e| e.archive_name.as_str()).collect();

        assert_eq!(order, vec!["p", "p/a.txt", "p/b.txt", "p/c.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_symlinks_walk_as_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("target.txt"), "content").unwrap();
        std::os::unix::fs::symlink(root.join("target.txt"), root.join("link.txt")).unwrap();

        let exclusions = ExclusionSet::default();
        let (entries, skipped) = collect(FilteredWalker::new(root, "p", &exclusions));
        assert_eq!(names(&entries), vec!["p", "p/link.txt", "p/target.txt"]);
        assert!(entries.iter().all(|e| e.archive_name == "p" || e.kind == EntryKind::File));
        assert!(skipped.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_symlink_matches_file_rule() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("target.txt"), "content").unwrap();
        std::os::unix::fs::symlink(root.join("target.txt"), root.join("thumbs.db")).unwrap();

        let exclusions = ExclusionSet::default();
        let (entries, skipped) = collect(FilteredWalker::new(root, "p", &exclusions));
        assert_eq!(names(&entries), vec!["p", "p/target.txt"]);
        assert_eq!(skipped[0].reason, SkipReason::Excluded(SkipKind::File));
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_and_dangling_symlinks_skipped_unless_followed() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(temp.path().join("outside")).unwrap();
        fs::write(temp.path().join("outside/inner.txt"), "i").unwrap();
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(temp.path().join("outside"), root.join("dir_link")).unwrap();
        std::os::unix::fs::symlink(root.join("gone.txt"), root.join("dangling")).unwrap();

        let exclusions = ExclusionSet::default();
        let (entries, skipped) = collect(FilteredWalker::new(&root, "p", &exclusions));
        assert_eq!(names(&entries), vec!["p"]);
        assert_eq!(skipped.len(), 2);
        assert!(skipped.iter().all(|s| s.reason == SkipReason::Symlink));

        let mut followed = Vec::new();
        for item in FilteredWalker::new(&root, "p", &exclusions)
            .follow_symlinks(true)
            .walk()
        {
            // a dangling link is an error once links are followed
            if let Ok(WalkItem::Entry(entry)) = item {
                followed.push(entry);
            }
        }
        assert_eq!(
            names(&followed),
            vec!["p", "p/dir_link", "p/dir_link/inner.txt"]
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_name_is_an_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(OsStr::from_bytes(b"caf\xe9.txt")), "x").unwrap();

        let exclusions = ExclusionSet::default();
        let errors: Vec<_> = FilteredWalker::new(temp.path(), "p", &exclusions)
            .walk()
            .filter_map(std::result::Result::err)
            .collect();
        assert!(matches!(errors.as_slice(), [PackError::NonUtf8Path { .. }]));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let exclusions = ExclusionSet::default();

        let first = FilteredWalker::new(&missing, "p", &exclusions).walk().next();
        assert!(matches!(first, Some(Err(PackError::Walk { .. }))));
    }

    #[test]
    fn test_archive_name_outside_root() {
        let result = archive_name(Path::new("/a"), Path::new("/b/c"), "p");
        assert!(matches!(result, Err(PackError::Walk { .. })));
    }
}
