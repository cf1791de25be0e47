//! treezip CLI - package a file or directory tree into a ZIP archive.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    logging::init(cli.verbose, cli.quiet);
    let formatter = output::create_formatter(cli.json, cli.verbose > 0, cli.quiet);

    let result = match &cli.command {
        cli::Commands::Pack(args) => commands::pack::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::FAILURE
        }
    }
}
