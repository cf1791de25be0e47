//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use treezip_core::PackReport;

pub struct JsonFormatter;

#[derive(Serialize)]
struct PackOutput {
    output_path: String,
    root_name: Option<String>,
    files_added: usize,
    directories_added: usize,
    entries_skipped: usize,
    skipped: Vec<String>,
    bytes_read: u64,
    bytes_compressed: u64,
    compression_ratio: f64,
    compression_percentage: f64,
    replaced_existing: bool,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl From<&PackReport> for PackOutput {
    fn from(report: &PackReport) -> Self {
        Self {
            output_path: report.output_path.display().to_string(),
            root_name: report.root_name.clone(),
            files_added: report.files_added,
            directories_added: report.directories_added,
            entries_skipped: report.entries_skipped(),
            skipped: report.skipped.clone(),
            bytes_read: report.bytes_read,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            compression_percentage: report.compression_percentage(),
            replaced_existing: report.replaced_existing,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        Self::write_to(&mut io::stdout(), value)
    }

    fn write_to<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(out, "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_pack_result(&self, report: &PackReport) -> Result<()> {
        Self::output(&JsonOutput::success("pack", PackOutput::from(report)))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("pack", format!("{error:?}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        // stdout carries only the result document
        let _ = Self::write_to(&mut io::stderr(), &output);
    }
}
