//! Configuration for packaging operations.

use crate::PackError;
use crate::Result;
use crate::exclusion::ExclusionMode;
use crate::exclusion::ExclusionSet;
use std::path::PathBuf;

/// Where the archive bytes are held until the destination is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Build the whole archive in memory and write it in one step.
    #[default]
    InMemory,
    /// Write entries to a staging file beside the destination and rename it
    /// into place once the archive is finished.
    Streaming,
}

/// Configuration for a single packaging call.
///
/// Replaces the positional argument list of [`crate::pack_positional`] with
/// named fields. All fields are optional; with the defaults the archive lands
/// next to the source as `<name>.zip`.
///
/// # Examples
///
/// ```
/// use treezip_core::ExclusionMode;
/// use treezip_core::PackConfig;
///
/// let config = PackConfig::default()
///     .with_destination_name("release.zip")
///     .with_exclusions(vec!["notes.txt".to_string()])
///     .with_exclusion_mode(ExclusionMode::Extend)
///     .with_compression_level(9);
///
/// let set = config.exclusion_set();
/// assert!(set.skips_file("notes.txt"));
/// assert!(set.skips_file(".DS_Store"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackConfig {
    /// Directory to write the archive into.
    ///
    /// Default: `None` (the source's parent directory).
    pub destination_dir: Option<PathBuf>,

    /// Archive file name.
    ///
    /// Default: `None` (`<source base name>.zip`).
    pub destination_name: Option<String>,

    /// Extra file names to exclude.
    ///
    /// Default: empty.
    pub exclusions: Vec<String>,

    /// Extra directory names to prune.
    ///
    /// Default: empty.
    pub excluded_dirs: Vec<String>,

    /// Whether extra names replace or extend the default exclusions.
    ///
    /// Default: [`ExclusionMode::Replace`].
    pub exclusion_mode: ExclusionMode,

    /// Root folder name for directory archives.
    ///
    /// Default: `None` (destination file name up to its first `.`).
    pub root_name: Option<String>,

    /// Compression level (0-9). `0` stores entries uncompressed.
    ///
    /// Default: `None` (deflate at level 6).
    pub compression_level: Option<u8>,

    /// Follow symlinks while walking.
    ///
    /// Default: `false` (links to files are archived with the target's
    /// content; links to directories are skipped and reported as warnings).
    pub follow_symlinks: bool,

    /// Visit directory entries in file-name order instead of platform order.
    ///
    /// Default: `false`.
    pub sort_entries: bool,

    /// Output buffering strategy.
    ///
    /// Default: [`OutputMode::InMemory`].
    pub output_mode: OutputMode,
}

impl PackConfig {
    /// Creates a `PackConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from the positional argument convention.
    ///
    /// Position 1 is the destination directory, position 2 the destination
    /// file name, and every further argument a file name to exclude. Extra
    /// names always replace the defaults. Empty strings in positions 1 and 2
    /// count as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use treezip_core::PackConfig;
    ///
    /// let config = PackConfig::from_positional(&["out", "tname.tar.zip", "skip.me"]);
    /// assert_eq!(config.destination_name.as_deref(), Some("tname.tar.zip"));
    /// assert!(!config.exclusion_set().skips_file(".DS_Store"));
    /// ```
    #[must_use]
    pub fn from_positional<S: AsRef<str>>(args: &[S]) -> Self {
        let non_empty = |idx: usize| {
            args.get(idx)
                .map(AsRef::as_ref)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            destination_dir: non_empty(0).map(PathBuf::from),
            destination_name: non_empty(1),
            exclusions: args
                .iter()
                .skip(2)
                .map(|s| s.as_ref().to_string())
                .collect(),
            exclusion_mode: ExclusionMode::Replace,
            ..Self::default()
        }
    }

    /// Sets the destination directory.
    #[must_use]
    pub fn with_destination_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.destination_dir = Some(dir.into());
        self
    }

    /// Sets the destination file name.
    #[must_use]
    pub fn with_destination_name(mut self, name: impl Into<String>) -> Self {
        self.destination_name = Some(name.into());
        self
    }

    /// Sets the extra file exclusions.
    #[must_use]
    pub fn with_exclusions(mut self, names: Vec<String>) -> Self {
        self.exclusions = names;
        self
    }

    /// Sets the extra directory exclusions.
    #[must_use]
    pub fn with_excluded_dirs(mut self, names: Vec<String>) -> Self {
        self.excluded_dirs = names;
        self
    }

    /// Sets how extra exclusions combine with the defaults.
    #[must_use]
    pub fn with_exclusion_mode(mut self, mode: ExclusionMode) -> Self {
        self.exclusion_mode = mode;
        self
    }

    /// Overrides the derived root folder name.
    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = Some(name.into());
        self
    }

    /// Sets the compression level.
    ///
    /// # Panics
    ///
    /// Panics if the level is greater than 9.
    /// Use `validate()` for non-panicking validation.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        assert!(level <= 9, "compression level must be 0-9");
        self.compression_level = Some(level);
        self
    }

    /// Sets whether to follow symlinks.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets whether to sort directory entries by name.
    #[must_use]
    pub fn with_sort_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    /// Sets the output buffering strategy.
    #[must_use]
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Resolves the effective exclusion set.
    #[must_use]
    pub fn exclusion_set(&self) -> ExclusionSet {
        ExclusionSet::from_names(
            self.exclusions.iter().cloned(),
            self.excluded_dirs.iter().cloned(),
            self.exclusion_mode,
        )
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level is set but greater than 9
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && level > 9
        {
            return Err(PackError::InvalidCompressionLevel { level });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_config_default() {
        let config = PackConfig::default();
        assert_eq!(config.destination_dir, None);
        assert_eq!(config.destination_name, None);
        assert!(config.exclusions.is_empty());
        assert!(config.excluded_dirs.is_empty());
        assert_eq!(config.exclusion_mode, ExclusionMode::Replace);
        assert_eq!(config.root_name, None);
        assert_eq!(config.compression_level, None);
        assert!(!config.follow_symlinks);
        assert!(!config.sort_entries);
        assert_eq!(config.output_mode, OutputMode::InMemory);
        assert_eq!(config.exclusion_set(), ExclusionSet::default());
    }

    #[test]
    fn test_pack_config_builder() {
        let config = PackConfig::new()
            .with_destination_dir("/tmp/out")
            .with_destination_name("a.zip")
            .with_exclusions(vec!["x.txt".to_string()])
            .with_excluded_dirs(vec!["target".to_string()])
            .with_exclusion_mode(ExclusionMode::Extend)
            .with_root_name("pkg")
            .with_compression_level(0)
            .with_follow_symlinks(true)
            .with_sort_entries(true)
            .with_output_mode(OutputMode::Streaming);

        assert_eq!(config.destination_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.destination_name.as_deref(), Some("a.zip"));
        assert_eq!(config.root_name.as_deref(), Some("pkg"));
        assert_eq!(config.compression_level, Some(0));
        assert!(config.follow_symlinks);
        assert!(config.sort_entries);
        assert_eq!(config.output_mode, OutputMode::Streaming);

        let set = config.exclusion_set();
        assert!(set.skips_file("x.txt"));
        assert!(set.skips_dir("target"));
        assert!(set.skips_file("thumbs.db"));
    }

    #[test]
    fn test_from_positional_empty() {
        let config = PackConfig::from_positional::<&str>(&[]);
        assert_eq!(config.destination_dir, None);
        assert_eq!(config.destination_name, None);
        assert_eq!(config.exclusion_set(), ExclusionSet::default());
    }

    #[test]
    fn test_from_positional_dest_only() {
        let config = PackConfig::from_positional(&[".", "a0_no_txt.zip"]);
        assert_eq!(config.destination_dir, Some(PathBuf::from(".")));
        assert_eq!(config.destination_name.as_deref(), Some("a0_no_txt.zip"));
        assert_eq!(config.exclusion_set(), ExclusionSet::default());
    }

    #[test]
    fn test_from_positional_empty_strings_are_absent() {
        let config = PackConfig::from_positional(&["", "", "skip.me"]);
        assert_eq!(config.destination_dir, None);
        assert_eq!(config.destination_name, None);

        let set = config.exclusion_set();
        assert_eq!(set.len(), 1);
        assert!(set.skips_file("skip.me"));
    }

    #[test]
    fn test_validate() {
        assert!(PackConfig::default().validate().is_ok());
        assert!(PackConfig::default().with_compression_level(9).validate().is_ok());

        let config = PackConfig {
            compression_level: Some(10),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PackError::InvalidCompressionLevel { level: 10 })
        ));
    }

    #[test]
    #[should_panic(expected = "compression level must be 0-9")]
    fn test_builder_invalid_compression() {
        let _config = PackConfig::default().with_compression_level(10);
    }
}
