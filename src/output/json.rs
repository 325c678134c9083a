//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the compatibility and outdated reports
//! - A `report` field naming which report the document holds

use crate::classify::{CompatibilityReport, IncompatibleDependency, OutdatedReport};
use crate::domain::{GemVersion, SourceOrigin};
use crate::output::{OutputFormatter, Verbosity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn write_json<T: Serialize>(&self, output: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(output).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

/// JSON representation of the compatibility report
#[derive(Serialize)]
struct JsonCompatibility<'a> {
    report: &'static str,
    framework: &'a str,
    framework_version: &'a GemVersion,
    total_incompatible: usize,
    latest_compatible: Vec<JsonIncompatible<'a>>,
    incompatible: Vec<JsonIncompatible<'a>>,
    no_new_version: Vec<JsonIncompatible<'a>>,
}

/// JSON representation of one incompatible gem
#[derive(Serialize)]
struct JsonIncompatible<'a> {
    name: &'a str,
    version: &'a GemVersion,
    source: SourceOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_version: Option<&'a GemVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_compatible_version: Option<&'a GemVersion>,
    /// Only in verbose mode
    #[serde(skip_serializing_if = "Option::is_none")]
    unsatisfied: Option<&'a [String]>,
}

/// JSON representation of the outdated report
#[derive(Serialize)]
struct JsonOutdated<'a> {
    report: &'static str,
    total: usize,
    out_of_date_count: usize,
    sourced_from_vcs: usize,
    percentage_out_of_date: u32,
    out_of_date: Vec<JsonOutdatedGem<'a>>,
}

/// JSON representation of one outdated gem
#[derive(Serialize)]
struct JsonOutdatedGem<'a> {
    name: &'a str,
    version: &'a GemVersion,
    released_at: Option<DateTime<Utc>>,
    source: SourceOrigin,
    /// `null` when no release was found
    latest_version: Option<&'a GemVersion>,
    latest_released_at: Option<DateTime<Utc>>,
}

impl JsonFormatter {
    fn incompatible_entries<'a>(
        &self,
        entries: &'a [IncompatibleDependency],
    ) -> Vec<JsonIncompatible<'a>> {
        entries
            .iter()
            .map(|entry| JsonIncompatible {
                name: &entry.name,
                version: &entry.version,
                source: entry.source,
                latest_version: entry.latest_version.as_ref(),
                latest_compatible_version: entry.latest_compatible_version.as_ref(),
                unsatisfied: (self.verbosity == Verbosity::Verbose)
                    .then_some(entry.unsatisfied.as_slice()),
            })
            .collect()
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_compatibility(
        &self,
        report: &CompatibilityReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = JsonCompatibility {
            report: "compatibility",
            framework: &report.framework,
            framework_version: &report.framework_version,
            total_incompatible: report.total_incompatible(),
            latest_compatible: self.incompatible_entries(&report.latest_compatible),
            incompatible: self.incompatible_entries(&report.incompatible),
            no_new_version: self.incompatible_entries(&report.no_new_version),
        };
        self.write_json(&output, writer)
    }

    fn format_outdated(
        &self,
        report: &OutdatedReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = JsonOutdated {
            report: "outdated",
            total: report.total,
            out_of_date_count: report.out_of_date.len(),
            sourced_from_vcs: report.sourced_from_vcs,
            percentage_out_of_date: report.percentage_out_of_date,
            out_of_date: report
                .out_of_date
                .iter()
                .map(|dep| JsonOutdatedGem {
                    name: &dep.name,
                    version: &dep.version,
                    released_at: dep.released_at,
                    source: dep.source,
                    latest_version: dep.latest.version(),
                    latest_released_at: dep.latest.release().and_then(|r| r.released_at),
                })
                .collect(),
        };
        self.write_json(&output, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::OutdatedDependency;
    use crate::domain::{ClassificationState, DependencyEntity, Release};
    use chrono::TimeZone;

    fn v(s: &str) -> GemVersion {
        GemVersion::parse(s).unwrap()
    }

    fn compatibility() -> CompatibilityReport {
        CompatibilityReport {
            framework: "Rails".to_string(),
            framework_version: v("5.0"),
            latest_compatible: vec![IncompatibleDependency {
                name: "devise".to_string(),
                version: v("3.5.10"),
                source: SourceOrigin::Vcs,
                state: ClassificationState::LatestCompatible,
                latest_version: Some(v("4.7.1")),
                latest_compatible_version: Some(v("4.7.1")),
                unsatisfied: vec!["railties (>= 3.2.6, < 5)".to_string()],
            }],
            incompatible: Vec::new(),
            no_new_version: vec![IncompatibleDependency {
                name: "billing".to_string(),
                version: v("0.1.0"),
                source: SourceOrigin::Local,
                state: ClassificationState::NoNewVersion,
                latest_version: None,
                latest_compatible_version: None,
                unsatisfied: vec!["unknown".to_string()],
            }],
        }
    }

    fn render(formatter: &JsonFormatter, report: &CompatibilityReport) -> serde_json::Value {
        let mut output = Vec::new();
        formatter.format_compatibility(report, &mut output).unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn test_compatibility_json() {
        let json = render(&JsonFormatter::new(Verbosity::Normal), &compatibility());

        assert_eq!(json["report"], "compatibility");
        assert_eq!(json["framework"], "Rails");
        assert_eq!(json["framework_version"], "5.0");
        assert_eq!(json["total_incompatible"], 2);
        assert_eq!(json["latest_compatible"][0]["name"], "devise");
        assert_eq!(json["latest_compatible"][0]["source"], "vcs");
        assert_eq!(json["latest_compatible"][0]["latest_compatible_version"], "4.7.1");
        assert!(json["latest_compatible"][0].get("unsatisfied").is_none());
        assert_eq!(json["incompatible"].as_array().unwrap().len(), 0);
        assert!(json["no_new_version"][0].get("latest_version").is_none());
    }

    #[test]
    fn test_compatibility_json_verbose() {
        let json = render(&JsonFormatter::new(Verbosity::Verbose), &compatibility());
        assert_eq!(
            json["latest_compatible"][0]["unsatisfied"][0],
            "railties (>= 3.2.6, < 5)"
        );
        assert_eq!(json["no_new_version"][0]["unsatisfied"][0], "unknown");
    }

    #[test]
    fn test_outdated_json() {
        let report = OutdatedReport {
            out_of_date: vec![
                OutdatedDependency {
                    name: "devise".to_string(),
                    version: v("3.5.10"),
                    released_at: Some(Utc.with_ymd_and_hms(2016, 5, 15, 0, 0, 0).unwrap()),
                    source: SourceOrigin::Registry,
                    latest: DependencyEntity::Found(Release::new("devise", v("4.7.1"))),
                },
                OutdatedDependency {
                    name: "billing".to_string(),
                    version: v("0.1.0"),
                    released_at: None,
                    source: SourceOrigin::Local,
                    latest: DependencyEntity::NotFound,
                },
            ],
            total: 4,
            sourced_from_vcs: 0,
            percentage_out_of_date: 50,
        };

        let mut output = Vec::new();
        JsonFormatter::new(Verbosity::Normal)
            .format_outdated(&report, &mut output)
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(json["report"], "outdated");
        assert_eq!(json["total"], 4);
        assert_eq!(json["out_of_date_count"], 2);
        assert_eq!(json["percentage_out_of_date"], 50);
        assert_eq!(json["out_of_date"][0]["latest_version"], "4.7.1");
        assert_eq!(json["out_of_date"][0]["released_at"], "2016-05-15T00:00:00Z");
        assert!(json["out_of_date"][1]["latest_version"].is_null());
        assert!(json["out_of_date"][1]["released_at"].is_null());
    }
}
