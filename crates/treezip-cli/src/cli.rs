//! CLI argument parsing using clap.

use clap::ArgAction;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;
use treezip_core::ExclusionMode;
use treezip_core::OutputMode;
use treezip_core::PackConfig;

#[derive(Parser)]
#[command(name = "treezip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Package a file or directory into a ZIP archive
    Pack(PackArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct PackArgs {
    /// File or directory to package
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Directory to write the archive into (default: the source's parent)
    #[arg(value_name = "DEST_DIR")]
    pub dest_dir: Option<PathBuf>,

    /// Archive file name (default: <source name>.zip)
    #[arg(value_name = "DEST_NAME")]
    pub dest_name: Option<String>,

    /// File names to exclude; replaces the default exclusions
    #[arg(value_name = "EXCLUDE")]
    pub trailing_exclusions: Vec<String>,

    /// File name to exclude (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Directory name to prune, including its contents (can be repeated)
    #[arg(long = "exclude-dir", value_name = "NAME")]
    pub exclude_dir: Vec<String>,

    /// Add exclusions to the defaults (.DS_Store, thumbs.db) instead of
    /// replacing them
    #[arg(long)]
    pub extend_defaults: bool,

    /// Compression level (0 stores entries uncompressed)
    #[arg(short = 'l', long = "level", value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,

    /// Root folder name inside the archive (default: archive name up to the
    /// first '.')
    #[arg(long, value_name = "NAME")]
    pub root_name: Option<String>,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Add entries in file-name order
    #[arg(long)]
    pub sort: bool,

    /// Stream the archive to disk instead of building it in memory
    #[arg(long)]
    pub stream: bool,
}

impl PackArgs {
    /// Builds the packaging configuration from the parsed arguments.
    pub fn to_config(&self) -> PackConfig {
        let mut exclusions = self.trailing_exclusions.clone();
        exclusions.extend(self.exclude.iter().cloned());

        let mut config = PackConfig {
            destination_dir: self.dest_dir.clone(),
            destination_name: self.dest_name.clone().filter(|n| !n.is_empty()),
            exclusions,
            excluded_dirs: self.exclude_dir.clone(),
            exclusion_mode: if self.extend_defaults {
                ExclusionMode::Extend
            } else {
                ExclusionMode::Replace
            },
            root_name: self.root_name.clone(),
            compression_level: self.compression_level,
            follow_symlinks: self.follow_symlinks,
            sort_entries: self.sort,
            output_mode: OutputMode::InMemory,
        };
        if self.stream {
            config.output_mode = OutputMode::Streaming;
        }
        config
    }

    /// Whether any exclusion was given on the command line.
    pub fn has_exclusions(&self) -> bool {
        !self.trailing_exclusions.is_empty()
            || !self.exclude.is_empty()
            || !self.exclude_dir.is_empty()
    }
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
