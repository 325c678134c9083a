//! Text output formatter for human-readable display
//!
//! This module provides:
//! - The compatibility report as three headed sections and a count line
//! - The outdated report with release ages and summary lines
//! - A `(loaded from git)` marker for gems pinned to a git source

use crate::classify::{CompatibilityReport, IncompatibleDependency, OutdatedReport};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

const GIT_MARKER: &str = " (loaded from git)";

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn heading(&self, text: &str, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}", text.bold().yellow())
        } else {
            writeln!(writer, "{}", text)
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// "name version[ (loaded from git)]" with the name highlighted
    fn entry_prefix(&self, entry: &IncompatibleDependency) -> String {
        let marker = if entry.is_sourced_from_vcs() {
            GIT_MARKER
        } else {
            ""
        };
        if self.color {
            format!(
                "{} {}{}",
                entry.name.bold(),
                entry.version.as_str().dimmed(),
                marker.cyan()
            )
        } else {
            format!("{} {}{}", entry.name, entry.version, marker)
        }
    }

    /// Unsatisfied framework requirements, verbose mode only
    fn write_unsatisfied(
        &self,
        entry: &IncompatibleDependency,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Verbose {
            return Ok(());
        }
        for requirement in &entry.unsatisfied {
            writeln!(
                writer,
                "    {}",
                self.dimmed(&format!("requires {}", requirement))
            )?;
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format_compatibility(
        &self,
        report: &CompatibilityReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let target = format!("{} {}", report.framework, report.framework_version);

        if !report.latest_compatible.is_empty() {
            self.heading(
                &format!("=> Incompatible with {} (with new versions that are compatible):", target),
                writer,
            )?;
            writeln!(
                writer,
                "These gems will need to be upgraded before upgrading to {}.",
                target
            )?;
            writeln!(writer)?;
            for entry in &report.latest_compatible {
                let upgrade = entry
                    .latest_compatible_version
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                let upgrade = if self.color {
                    upgrade.green().bold().to_string()
                } else {
                    upgrade
                };
                writeln!(writer, "{} - upgrade to {}", self.entry_prefix(entry), upgrade)?;
                self.write_unsatisfied(entry, writer)?;
            }
            writeln!(writer)?;
        }

        if !report.incompatible.is_empty() {
            self.heading(
                &format!("=> Incompatible with {} (with no new compatible versions):", target),
                writer,
            )?;
            writeln!(
                writer,
                "These gems will need to be removed or replaced before upgrading to {}.",
                target
            )?;
            writeln!(writer)?;
            for entry in &report.incompatible {
                let latest = entry
                    .latest_version
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                let latest = if self.color {
                    latest.red().to_string()
                } else {
                    latest
                };
                let fallback = entry
                    .latest_compatible_version
                    .as_ref()
                    .map(|v| self.dimmed(&format!(" (latest compatible: {})", v)))
                    .unwrap_or_default();
                writeln!(
                    writer,
                    "{} - new version, {}, is not compatible with {}{}",
                    self.entry_prefix(entry),
                    latest,
                    target,
                    fallback
                )?;
                self.write_unsatisfied(entry, writer)?;
            }
            writeln!(writer)?;
        }

        if !report.no_new_version.is_empty() {
            self.heading(
                &format!("=> Incompatible with {} (with no new versions):", target),
                writer,
            )?;
            writeln!(
                writer,
                "These gems will need to be upgraded by us or removed before upgrading to {}.",
                target
            )?;
            writeln!(
                writer,
                "{}",
                self.dimmed("This list is likely to contain internal gems, like Cuddlefish.")
            )?;
            writeln!(writer)?;
            for entry in &report.no_new_version {
                writeln!(writer, "{} - new version not found", self.entry_prefix(entry))?;
                self.write_unsatisfied(entry, writer)?;
            }
            writeln!(writer)?;
        }

        let count = format!(
            "{} gems incompatible with {}",
            report.total_incompatible(),
            target
        );
        if self.color && !report.is_empty() {
            writeln!(writer, "{}", count.red().bold())
        } else if self.color {
            writeln!(writer, "{}", count.green().bold())
        } else {
            writeln!(writer, "{}", count)
        }
    }

    fn format_outdated(
        &self,
        report: &OutdatedReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for dep in &report.out_of_date {
            let name = if self.color {
                dep.name.bold().to_string()
            } else {
                dep.name.clone()
            };
            writeln!(
                writer,
                "{} {}: released {} (latest version, {}, released {})",
                name,
                dep.version,
                dep.age(),
                dep.latest.version_label(),
                dep.latest.age()
            )?;
        }

        if !report.out_of_date.is_empty() {
            writeln!(writer)?;
        }

        writeln!(
            writer,
            "{}",
            self.dimmed(&format!("{} gems are sourced from git", report.sourced_from_vcs))
        )?;

        let summary = format!(
            "{} of the {} gems are out-of-date ({}%)",
            report.out_of_date.len(),
            report.total,
            report.percentage_out_of_date
        );
        if self.color {
            writeln!(writer, "{}", summary.bold())
        } else {
            writeln!(writer, "{}", summary)
        }
    }
}
