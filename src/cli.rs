//! CLI argument parsing module for bundle-report

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Report outdated gems and gems blocking a Rails upgrade
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bundle-report",
    version,
    about = "Report outdated gems and gems blocking a Rails upgrade"
)]
pub struct CliArgs {
    /// Report to run (default: compatibility)
    #[command(subcommand)]
    pub command: Option<ReportCommand>,

    // Compatibility options
    /// Target Rails version for the compatibility report (default: 5.0)
    #[arg(long = "rails-version", value_name = "STRING", global = true)]
    pub rails_version: Option<String>,

    /// Include Rails' own gems in the compatibility report
    #[arg(long = "include-rails-gems", global = true)]
    pub include_rails_gems: bool,

    // Inputs
    /// Path to Gemfile.lock (default: ./Gemfile.lock)
    #[arg(long, value_name = "PATH", global = true, env = "BUNDLE_REPORT_LOCKFILE")]
    pub lockfile: Option<PathBuf>,

    /// Path to the release catalog JSON (default: ./.bundle-report/releases.json)
    #[arg(long, value_name = "PATH", global = true, env = "BUNDLE_REPORT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Path to a config file (default: ./bundle-report.toml if present)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    // Output options
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available reports
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportCommand {
    /// List gems that are behind their newest release
    Outdated,
    /// List gems that do not work with the target Rails version
    Compatibility,
}

impl CliArgs {
    /// The report to run; compatibility when no subcommand is given
    pub fn report(&self) -> ReportCommand {
        self.command.unwrap_or(ReportCommand::Compatibility)
    }
}
