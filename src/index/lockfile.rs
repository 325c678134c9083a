//! Gemfile.lock parser
//!
//! Handles:
//! - `GEM`, `GIT` and `PATH` source sections with their `specs:` blocks
//! - Nested runtime dependencies with optional requirements
//! - Platform-specific specs (`nokogiri (1.10.4-x86_64-linux)`)
//!
//! Other sections (`PLATFORMS`, `DEPENDENCIES`, `BUNDLED WITH`, ...) are skipped.

use crate::domain::{GemVersion, Requirement, RuntimeRequirement, SourceOrigin};
use crate::error::LockfileError;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

// Spec entry: four spaces, name, version in parentheses
static SPEC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {4}([^\s(]+) \(([^)]+)\)$").unwrap());

// Dependency of a spec: six spaces, name, optional requirement
static SPEC_DEPENDENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {6}([^\s(]+)(?: \(([^)]*)\))?$").unwrap());

/// One resolved gem from the lockfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedSpec {
    pub name: String,
    pub version: GemVersion,
    pub source: SourceOrigin,
    pub requirements: Vec<RuntimeRequirement>,
}

/// Which lockfile section the parser is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Source(SourceOrigin),
    Other,
}

/// Parse the content of a Gemfile.lock
///
/// Returns specs in file order. When a gem is locked for several platforms
/// only the first entry is kept.
pub fn parse_lockfile(content: &str) -> Result<Vec<LockedSpec>, LockfileError> {
    let mut specs: Vec<LockedSpec> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut section = Section::Other;
    let mut in_specs = false;
    // Whether the spec currently receiving dependencies was kept
    let mut collecting = false;

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim_end();

        if line.is_empty() {
            continue;
        }

        // Section headers start at column zero
        if !line.starts_with(' ') {
            section = match line {
                "GEM" => Section::Source(SourceOrigin::Registry),
                "GIT" => Section::Source(SourceOrigin::Vcs),
                "PATH" => Section::Source(SourceOrigin::Local),
                _ => Section::Other,
            };
            in_specs = false;
            collecting = false;
            continue;
        }

        let Section::Source(origin) = section else {
            continue;
        };

        if line == "  specs:" {
            in_specs = true;
            continue;
        }

        // Source attributes such as `remote:` or `revision:`
        if !line.starts_with("    ") {
            in_specs = false;
            collecting = false;
            continue;
        }

        if !in_specs {
            continue;
        }

        if let Some(caps) = SPEC_RE.captures(line) {
            let name = caps[1].to_string();
            let version = parse_locked_version(&caps[2])
                .map_err(|e| LockfileError::parse_error(line_no, e.to_string()))?;

            collecting = seen.insert(name.clone());
            if collecting {
                specs.push(LockedSpec {
                    name,
                    version,
                    source: origin,
                    requirements: Vec::new(),
                });
            }
            continue;
        }

        if let Some(caps) = SPEC_DEPENDENCY_RE.captures(line) {
            if !collecting {
                continue;
            }
            let requirement = match caps.get(2) {
                Some(m) => Requirement::parse(m.as_str())
                    .map_err(|e| LockfileError::parse_error(line_no, e.to_string()))?,
                None => Requirement::any(),
            };
            if let Some(spec) = specs.last_mut() {
                spec.requirements
                    .push(RuntimeRequirement::new(&caps[1], requirement));
            }
            continue;
        }

        return Err(LockfileError::parse_error(
            line_no,
            format!("unrecognized spec line '{}'", line.trim()),
        ));
    }

    Ok(specs)
}

/// Read and parse a Gemfile.lock from disk
pub fn read_lockfile(path: &Path) -> Result<Vec<LockedSpec>, LockfileError> {
    if !path.exists() {
        return Err(LockfileError::not_found(path));
    }
    let content =
        std::fs::read_to_string(path).map_err(|e| LockfileError::read_error(path, e))?;
    parse_lockfile(&content)
}

/// Strip a platform suffix (`1.10.4-x86_64-linux`) before parsing
fn parse_locked_version(raw: &str) -> Result<GemVersion, crate::error::VersionError> {
    let version = raw.split_once('-').map(|(v, _)| v).unwrap_or(raw);
    GemVersion::parse(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCKFILE: &str = r#"GIT
  remote: https://github.com/example/paperclip.git
  revision: 0123456789abcdef
  branch: rails5
  specs:
    paperclip (4.3.7)
      activemodel (>= 3.2.0)
      activesupport (>= 3.2.0)
      mime-types

PATH
  remote: engines/billing
  specs:
    billing (0.1.0)
      rails (~> 4.2)

GEM
  remote: https://rubygems.org/
  specs:
    actionpack (4.2.11)
      actionview (= 4.2.11)
      rack (~> 1.6)
    devise (3.5.10)
      bcrypt (~> 3.0)
      railties (>= 3.2.6, < 5)
    mime-types (3.2.2)
    nokogiri (1.10.4)
      mini_portile2 (~> 2.4.0)
    nokogiri (1.10.4-x86_64-linux)
      mini_portile2 (~> 2.4.0)

PLATFORMS
  ruby
  x86_64-linux

DEPENDENCIES
  devise (~> 3.5)
  paperclip!

BUNDLED WITH
   1.17.3
"#;

    fn find<'a>(specs: &'a [LockedSpec], name: &str) -> &'a LockedSpec {
        specs.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn test_parse_all_sources_in_order() {
        let specs = parse_lockfile(LOCKFILE).unwrap();
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["paperclip", "billing", "actionpack", "devise", "mime-types", "nokogiri"]
        );
    }

    #[test]
    fn test_source_origins() {
        let specs = parse_lockfile(LOCKFILE).unwrap();
        assert_eq!(find(&specs, "paperclip").source, SourceOrigin::Vcs);
        assert_eq!(find(&specs, "billing").source, SourceOrigin::Local);
        assert_eq!(find(&specs, "devise").source, SourceOrigin::Registry);
    }

    #[test]
    fn test_spec_requirements() {
        let specs = parse_lockfile(LOCKFILE).unwrap();
        let devise = find(&specs, "devise");
        assert_eq!(devise.version.as_str(), "3.5.10");
        assert_eq!(devise.requirements.len(), 2);
        assert_eq!(devise.requirements[1].name, "railties");
        assert_eq!(devise.requirements[1].requirement.as_str(), ">= 3.2.6, < 5");
    }

    #[test]
    fn test_dependency_without_requirement_is_any() {
        let specs = parse_lockfile(LOCKFILE).unwrap();
        let paperclip = find(&specs, "paperclip");
        let mime = paperclip
            .requirements
            .iter()
            .find(|r| r.name == "mime-types")
            .unwrap();
        assert!(mime.requirement.is_any());
    }

    #[test]
    fn test_platform_variants_collapse() {
        let specs = parse_lockfile(LOCKFILE).unwrap();
        let nokogiri: Vec<_> = specs.iter().filter(|s| s.name == "nokogiri").collect();
        assert_eq!(nokogiri.len(), 1);
        assert_eq!(nokogiri[0].version.as_str(), "1.10.4");
        assert_eq!(nokogiri[0].requirements.len(), 1);
    }

    #[test]
    fn test_platform_suffix_stripped() {
        let content = "GEM\n  remote: https://rubygems.org/\n  specs:\n    ffi (1.11.1-x64-mingw32)\n";
        let specs = parse_lockfile(content).unwrap();
        assert_eq!(specs[0].version.as_str(), "1.11.1");
    }

    #[test]
    fn test_dependencies_section_is_ignored() {
        let specs = parse_lockfile(LOCKFILE).unwrap();
        // `devise (~> 3.5)` under DEPENDENCIES must not become a spec
        assert_eq!(find(&specs, "devise").version.as_str(), "3.5.10");
    }

    #[test]
    fn test_empty_lockfile() {
        assert!(parse_lockfile("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_version_reports_line() {
        let content = "GEM\n  remote: https://rubygems.org/\n  specs:\n    rack (one.two)\n";
        let err = parse_lockfile(content).unwrap_err();
        assert!(matches!(err, LockfileError::ParseError { line: 4, .. }));
    }

    #[test]
    fn test_unrecognized_spec_line() {
        let content = "GEM\n  specs:\n    rack 1.6.0\n";
        let err = parse_lockfile(content).unwrap_err();
        assert!(err.to_string().contains("unrecognized spec line"));
    }

    #[test]
    fn test_read_lockfile_missing() {
        let err = read_lockfile(Path::new("/nonexistent/Gemfile.lock")).unwrap_err();
        assert!(matches!(err, LockfileError::NotFound { .. }));
    }
}
