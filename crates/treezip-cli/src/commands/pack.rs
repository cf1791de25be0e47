//! Pack command implementation.

use crate::cli::PackArgs;
use crate::error::add_source_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use tracing::debug;
use treezip_core::pack_path;

pub fn execute(args: &PackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = args.to_config();
    debug!(?config, "parsed pack arguments");

    if args.has_exclusions() && args.source.is_file() {
        formatter.format_warning("exclusions are ignored when packaging a single file");
    }

    let report = add_source_context(pack_path(&args.source, &config), &args.source)?;
    formatter.format_pack_result(&report)?;

    Ok(())
}
