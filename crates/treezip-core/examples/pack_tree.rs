//! Example: Packaging a directory tree with treezip-core
//!
//! Run with: `cargo run --example pack_tree`

use treezip_core::ExclusionMode;
use treezip_core::PackConfig;
use treezip_core::pack_path;
use treezip_core::pack_positional;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("example_tree/assets")?;
    std::fs::write("example_tree/readme.txt", "Hello, treezip!")?;
    std::fs::write("example_tree/assets/logo.txt", "logo")?;
    std::fs::write("example_tree/assets/.DS_Store", "finder metadata")?;

    // Example 1: Positional arguments, default exclusions
    println!("Example 1: Positional arguments");
    let report = pack_positional("example_tree", &[".", "example.v1.zip"])?;
    println!(
        "  {} entries under '{}', {} skipped",
        report.total_entries(),
        report.root_name.as_deref().unwrap_or(""),
        report.entries_skipped()
    );
    std::fs::remove_file(&report.output_path)?;

    // Example 2: Structured config extending the defaults
    println!("\nExample 2: Structured config");
    let config = PackConfig::default()
        .with_destination_name("example.zip")
        .with_excluded_dirs(vec!["assets".to_string()])
        .with_exclusion_mode(ExclusionMode::Extend)
        .with_compression_level(9);
    let report = pack_path("example_tree", &config)?;
    println!(
        "  {} files, compression {:.1}%",
        report.files_added,
        report.compression_percentage()
    );
    std::fs::remove_file(&report.output_path)?;

    std::fs::remove_dir_all("example_tree")?;
    println!("\nExamples completed successfully!");
    Ok(())
}
