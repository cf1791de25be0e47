//! Diagnostic logging setup.

use tracing::Level;

/// Maps the verbosity flags to the maximum level that gets printed.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber. Events go to stderr so stdout stays
/// reserved for results.
pub fn init(verbose: u8, quiet: bool) {
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
