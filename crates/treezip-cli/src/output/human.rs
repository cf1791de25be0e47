//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use treezip_core::PackReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, c) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_pack_result(&self, report: &PackReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let path = report.output_path.display();
        if self.use_colors {
            self.line(&format!(
                "{} Archive created: {path}",
                style("✓").green().bold()
            ));
        } else {
            self.line(&format!("Archive created: {path}"));
        }

        self.line("");
        if let Some(root) = report.root_name.as_deref().filter(|r| !r.is_empty()) {
            self.line(&format!("  Root folder:      {root}/"));
        }
        self.line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        self.line(&format!(
            "  Directories:      {}",
            Self::format_number(report.directories_added)
        ));
        self.line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_read)
        ));

        if report.bytes_compressed > 0 {
            self.line(&format!(
                "  Archive size:     {}",
                Self::format_size(report.bytes_compressed)
            ));
            if report.bytes_read > 0 {
                self.line(&format!(
                    "  Compression:      {:.1}%",
                    report.compression_percentage()
                ));
            }
        }

        if report.entries_skipped() > 0 {
            self.line(&format!(
                "  Entries skipped:  {}",
                Self::format_number(report.entries_skipped())
            ));
        }

        if self.verbose {
            for name in &report.skipped {
                self.line(&format!("    - {name}"));
            }
            if report.replaced_existing {
                self.line("  Replaced an existing archive");
            }
            self.line(&format!("  Duration:         {:?}", report.duration));
        }

        if report.has_warnings() {
            self.line("");
            if self.use_colors {
                self.line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                self.line("Warnings:");
            }
            for warning in &report.warnings {
                self.line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // errors are printed even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}
