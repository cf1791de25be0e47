//! Source and destination path resolution.

use crate::PackError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Extension appended to the source name when no file name is given.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// A resolved archive destination.
///
/// # Examples
///
/// ```
/// use treezip_core::destination::Destination;
/// use std::path::Path;
///
/// let dest = Destination::resolve(Path::new("/work/site"), None, None)?;
/// assert_eq!(dest.path(), Path::new("/work/site.zip"));
/// assert_eq!(dest.root_name(), "site");
/// # Ok::<(), treezip_core::PackError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    dir: PathBuf,
    file_name: String,
    path: PathBuf,
}

impl Destination {
    /// Resolves the destination for an already absolute `source`.
    ///
    /// `dir` defaults to the source's parent and `file_name` to
    /// `<source base name>.zip`. Empty values count as absent.
    pub fn resolve(source: &Path, dir: Option<&Path>, file_name: Option<&str>) -> Result<Self> {
        let dir = match dir.filter(|d| !d.as_os_str().is_empty()) {
            Some(dir) => absolutize(dir)?,
            None => source
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| PackError::InvalidDestination {
                    path: source.to_path_buf(),
                })?,
        };

        let file_name = match file_name.filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("{}.{ARCHIVE_EXTENSION}", base_name(source)?),
        };

        let path = clean(&dir.join(&file_name));
        if path.file_name().is_none() {
            return Err(PackError::InvalidDestination { path });
        }

        Ok(Self {
            dir,
            file_name,
            path,
        })
    }

    /// Directory the archive is written into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Archive file name as supplied or defaulted.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Absolute path of the archive.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root folder name for directory archives.
    ///
    /// See [`root_name_for`].
    #[must_use]
    pub fn root_name(&self) -> &str {
        root_name_for(&self.file_name)
    }

    /// Hidden sibling used while streaming the archive to disk.
    #[must_use]
    pub fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| self.file_name.clone(), |n| n.to_string_lossy().into_owned());
        self.path.with_file_name(format!(".{name}.partial"))
    }
}

/// Derives the root folder name from an archive file name.
///
/// The name is cut at its first `.`, so `tname.tar.zip` yields `tname` and
/// `archive.v2.zip` yields `archive`. A name starting with `.` yields an
/// empty root.
///
/// # Examples
///
/// ```
/// use treezip_core::destination::root_name_for;
///
/// assert_eq!(root_name_for("tname.tar.zip"), "tname");
/// assert_eq!(root_name_for("plain"), "plain");
/// assert_eq!(root_name_for(".zip"), "");
/// ```
#[must_use]
pub fn root_name_for(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Returns the UTF-8 base name of `path`.
pub fn base_name(path: &Path) -> Result<&str> {
    let name = path.file_name().ok_or_else(|| PackError::InvalidDestination {
        path: path.to_path_buf(),
    })?;
    name.to_str().ok_or_else(|| PackError::NonUtf8Path {
        path: path.to_path_buf(),
    })
}

/// Makes `path` absolute against the current directory and folds `.` and
/// `..` components lexically. Symlinks are not resolved.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    Ok(clean(&absolute))
}

fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // input is absolute, so `..` at the root stays at the root
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
