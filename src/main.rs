//! bundle-report - Gemfile.lock outdated and Rails compatibility reports
//!
//! Reports which installed gems are behind their newest release and which
//! stand in the way of upgrading to a target Rails version.

use bundle_report::classify::Classifier;
use bundle_report::cli::{CliArgs, ReportCommand};
use bundle_report::config::Settings;
use bundle_report::index::SnapshotIndex;
use bundle_report::output::{create_formatter, OutputConfig};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("bundle_report=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and version go to stdout and succeed; usage errors go to stderr
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(args.debug);

    tracing::debug!("bundle-report starting with args: {:?}", args);

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let settings = Settings::resolve(&args)?;
    if !settings.color {
        colored::control::set_override(false);
    }

    let report = args.report();

    // The target version must be valid before anything is loaded
    let framework_version = match report {
        ReportCommand::Compatibility => Some(settings.framework_version()?),
        ReportCommand::Outdated => None,
    };

    if args.verbose {
        eprintln!("bundle-report v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Lockfile: {}", settings.lockfile.display());
        eprintln!("Catalog: {}", settings.catalog.display());
    }

    let index = SnapshotIndex::load(&settings.lockfile, &settings.catalog)?;
    let classifier = Classifier::new(&index);

    let formatter = create_formatter(OutputConfig::new(settings.format, args.verbose, settings.color));
    let mut stdout = io::stdout().lock();

    match framework_version {
        Some(framework_version) => {
            let report =
                classifier.compatibility_report(&framework_version, settings.include_rails_gems);
            formatter.format_compatibility(&report, &mut stdout)?;
        }
        None => {
            let report = classifier.outdated_report()?;
            formatter.format_outdated(&report, &mut stdout)?;
        }
    }
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}
