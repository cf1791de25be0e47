//! Name-based exclusion rules.
//!
//! Rules match the bare file name of a filesystem entry, never its path.
//! Each name is classified as either a file exclusion or a directory
//! exclusion; a name only applies to entries of its own kind.

use std::collections::HashMap;
use std::path::Path;

/// Names excluded when no caller-supplied exclusions replace them.
pub const DEFAULT_EXCLUSIONS: [&str; 2] = [".DS_Store", "thumbs.db"];

/// Which kind of entry an exclusion rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipKind {
    /// Skip regular files with this name.
    File,
    /// Skip directories with this name, including everything beneath them.
    Directory,
}

/// How caller-supplied exclusions combine with [`DEFAULT_EXCLUSIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExclusionMode {
    /// Any caller-supplied name discards the defaults.
    ///
    /// With no caller names the defaults stay in effect.
    #[default]
    Replace,
    /// Caller-supplied names are added to the defaults.
    Extend,
}

/// A mapping from entry name to the kind of entry it excludes.
///
/// # Examples
///
/// ```
/// use treezip_core::ExclusionSet;
/// use treezip_core::SkipKind;
///
/// let set = ExclusionSet::default();
/// assert!(set.skips_file(".DS_Store"));
/// assert!(!set.skips_dir(".DS_Store"));
///
/// let set = ExclusionSet::empty().with_dir("node_modules");
/// assert_eq!(set.get("node_modules"), Some(SkipKind::Directory));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    rules: HashMap<String, SkipKind>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        let mut set = Self::empty();
        for name in DEFAULT_EXCLUSIONS {
            set.insert(name, SkipKind::File);
        }
        set
    }
}

impl ExclusionSet {
    /// Creates a set with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Builds a set from caller-supplied names.
    ///
    /// With [`ExclusionMode::Replace`], supplying at least one name (file or
    /// directory) drops the defaults. With no names at all the defaults apply
    /// in either mode.
    #[must_use]
    pub fn from_names<F, D>(files: F, dirs: D, mode: ExclusionMode) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let mut custom = Self::empty();
        for name in files {
            custom.insert(name, SkipKind::File);
        }
        for name in dirs {
            custom.insert(name, SkipKind::Directory);
        }

        if custom.is_empty() {
            return Self::default();
        }

        match mode {
            ExclusionMode::Replace => custom,
            ExclusionMode::Extend => {
                let mut merged = Self::default();
                merged.rules.extend(custom.rules);
                merged
            }
        }
    }

    /// Adds a file exclusion.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>) -> Self {
        self.insert(name, SkipKind::File);
        self
    }

    /// Adds a directory exclusion.
    #[must_use]
    pub fn with_dir(mut self, name: impl Into<String>) -> Self {
        self.insert(name, SkipKind::Directory);
        self
    }

    /// Inserts or reclassifies a rule.
    pub fn insert(&mut self, name: impl Into<String>, kind: SkipKind) {
        self.rules.insert(name.into(), kind);
    }

    /// Returns the classification for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SkipKind> {
        self.rules.get(name).copied()
    }

    /// Returns `true` if a regular file called `name` is excluded.
    #[must_use]
    pub fn skips_file(&self, name: &str) -> bool {
        self.get(name) == Some(SkipKind::File)
    }

    /// Returns `true` if a directory called `name` is excluded.
    #[must_use]
    pub fn skips_dir(&self, name: &str) -> bool {
        self.get(name) == Some(SkipKind::Directory)
    }

    /// Checks the base name of `path` against the rule for `kind`.
    ///
    /// Paths without a UTF-8 file name never match.
    #[must_use]
    pub fn matches(&self, path: &Path, kind: SkipKind) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.get(name) == Some(kind))
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over the rule names in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}
