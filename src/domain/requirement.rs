//! Version requirements declared by gem specifications
//!
//! Handles constraints like:
//! - RubyGems: `~> 5.0`, `= 5.2.3`, `!= 5.1.0`, `>= 4.2, < 6`
//! - Cargo/npm style: `^5.1`, `~5.1.2`
//! - Any version: `*` or an empty string
//!
//! A compound requirement (comma-separated) is satisfied only when every
//! constraint holds.

use super::GemVersion;
use crate::error::VersionError;
use regex::Regex;
use semver::{Comparator, Op};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// Operator followed by a version, optional space between them
static CONSTRAINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(~>|!=|>=|<=|=|>|<|\^|~)?\s*(\S+)$").unwrap());

/// The kind of a single version constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Exact version (`= 1.2.3` or a bare `1.2.3`)
    Exact,
    /// Anything but this version (`!= 1.2.3`)
    NotEqual,
    /// Pessimistic constraint (`~> 1.2`)
    Pessimistic,
    /// Caret range (`^1.2.3`)
    Caret,
    /// Tilde range (`~1.2.3`)
    Tilde,
    /// Greater than or equal (`>= 1.2.3`)
    GreaterOrEqual,
    /// Greater than (`> 1.2.3`)
    Greater,
    /// Less than or equal (`<= 1.2.3`)
    LessOrEqual,
    /// Less than (`< 1.2.3`)
    Less,
}

impl ConstraintKind {
    fn from_operator(op: Option<&str>) -> Self {
        match op {
            Some("~>") => ConstraintKind::Pessimistic,
            Some("!=") => ConstraintKind::NotEqual,
            Some(">=") => ConstraintKind::GreaterOrEqual,
            Some("<=") => ConstraintKind::LessOrEqual,
            Some(">") => ConstraintKind::Greater,
            Some("<") => ConstraintKind::Less,
            Some("^") => ConstraintKind::Caret,
            Some("~") => ConstraintKind::Tilde,
            _ => ConstraintKind::Exact,
        }
    }
}

/// One operator/version pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub version: GemVersion,
}

impl Constraint {
    /// Creates a new constraint
    pub fn new(kind: ConstraintKind, version: GemVersion) -> Self {
        Self { kind, version }
    }

    /// Returns true if `candidate` satisfies this constraint
    pub fn is_satisfied_by(&self, candidate: &GemVersion) -> bool {
        match self.kind {
            ConstraintKind::Exact => candidate == &self.version,
            ConstraintKind::NotEqual => candidate != &self.version,
            ConstraintKind::GreaterOrEqual => candidate >= &self.version,
            ConstraintKind::Greater => candidate > &self.version,
            ConstraintKind::LessOrEqual => candidate <= &self.version,
            ConstraintKind::Less => candidate < &self.version,
            ConstraintKind::Pessimistic => {
                // Upper bound is checked against the release part only
                candidate >= &self.version && candidate.release() < self.version.bump()
            }
            ConstraintKind::Caret => self.semver_comparator(Op::Caret).matches(candidate.semver()),
            ConstraintKind::Tilde => self.semver_comparator(Op::Tilde).matches(candidate.semver()),
        }
    }

    /// Caret and tilde follow Cargo semantics, so precision matters
    fn semver_comparator(&self, op: Op) -> Comparator {
        let written = self.version.release_segments().len();
        let base = self.version.semver();
        Comparator {
            op,
            major: base.major,
            minor: (written > 1 || !base.pre.is_empty()).then_some(base.minor),
            patch: (written > 2 || !base.pre.is_empty()).then_some(base.patch),
            pre: base.pre.clone(),
        }
    }
}

/// A parsed requirement, possibly compound, keeping its written form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Requirement {
    raw: String,
    constraints: Vec<Constraint>,
}

impl Requirement {
    /// A requirement satisfied by every version
    pub fn any() -> Self {
        Self {
            raw: String::new(),
            constraints: Vec::new(),
        }
    }

    /// Parse a requirement string such as `>= 4.2, < 6`
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let trimmed = raw.trim();
        let mut constraints = Vec::new();

        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Self {
                raw: trimmed.to_string(),
                constraints,
            });
        }

        for part in trimmed.split(',') {
            let part = part.trim();
            let caps = CONSTRAINT_RE
                .captures(part)
                .ok_or_else(|| VersionError::invalid_requirement(raw, "unrecognized constraint"))?;
            let kind = ConstraintKind::from_operator(caps.get(1).map(|m| m.as_str()));
            let version_str = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            let version = GemVersion::parse(version_str)
                .map_err(|e| VersionError::invalid_requirement(raw, e.to_string()))?;
            constraints.push(Constraint::new(kind, version));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            constraints,
        })
    }

    /// Returns true if every constraint is satisfied by `candidate`
    pub fn is_satisfied_by(&self, candidate: &GemVersion) -> bool {
        self.constraints
            .iter()
            .all(|constraint| constraint.is_satisfied_by(candidate))
    }

    /// Returns true if this requirement accepts any version
    pub fn is_any(&self) -> bool {
        self.constraints.is_empty()
    }

    /// The individual constraints
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The requirement as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Default for Requirement {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_empty() {
            write!(f, ">= 0")
        } else {
            write!(f, "{}", self.raw)
        }
    }
}

impl TryFrom<String> for Requirement {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Requirement> for String {
    fn from(requirement: Requirement) -> Self {
        requirement.raw
    }
}

/// A runtime dependency declared by a gem: target name plus requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeRequirement {
    pub name: String,
    pub requirement: Requirement,
}

impl RuntimeRequirement {
    /// Creates a new runtime requirement
    pub fn new(name: impl Into<String>, requirement: Requirement) -> Self {
        Self {
            name: name.into(),
            requirement,
        }
    }
}

impl fmt::Display for RuntimeRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.requirement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> GemVersion {
        GemVersion::parse(s).unwrap()
    }

    fn req(s: &str) -> Requirement {
        Requirement::parse(s).unwrap()
    }

    #[test]
    fn test_parse_kinds() {
        let cases = [
            ("~> 5.0", ConstraintKind::Pessimistic),
            ("= 5.0", ConstraintKind::Exact),
            ("5.0", ConstraintKind::Exact),
            ("!= 5.0", ConstraintKind::NotEqual),
            (">= 5.0", ConstraintKind::GreaterOrEqual),
            ("> 5.0", ConstraintKind::Greater),
            ("<= 5.0", ConstraintKind::LessOrEqual),
            ("< 5.0", ConstraintKind::Less),
            ("^5.0", ConstraintKind::Caret),
            ("~5.0", ConstraintKind::Tilde),
        ];
        for (raw, kind) in cases {
            let parsed = req(raw);
            assert_eq!(parsed.constraints().len(), 1, "{}", raw);
            assert_eq!(parsed.constraints()[0].kind, kind, "{}", raw);
        }
    }

    #[test]
    fn test_parse_without_space() {
        assert_eq!(req(">=4.2").constraints()[0].kind, ConstraintKind::GreaterOrEqual);
        assert_eq!(req("~>5.1").constraints()[0].kind, ConstraintKind::Pessimistic);
    }

    #[test]
    fn test_parse_any() {
        assert!(req("").is_any());
        assert!(req("*").is_any());
        assert!(req("").is_satisfied_by(&v("0.0.1")));
        assert_eq!(Requirement::any().to_string(), ">= 0");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Requirement::parse(">> 1.0").is_err());
        assert!(Requirement::parse(">= banana").is_err());
        assert!(Requirement::parse(">= 1.0,").is_err());
    }

    #[test]
    fn test_pessimistic_two_segments() {
        let r = req("~> 5.0");
        assert!(r.is_satisfied_by(&v("5.0")));
        assert!(r.is_satisfied_by(&v("5.2.3")));
        assert!(!r.is_satisfied_by(&v("6.0")));
        assert!(!r.is_satisfied_by(&v("6.0.0.rc1")));
        assert!(!r.is_satisfied_by(&v("4.2")));
    }

    #[test]
    fn test_pessimistic_three_segments() {
        let r = req("~> 5.0.1");
        assert!(r.is_satisfied_by(&v("5.0.1")));
        assert!(r.is_satisfied_by(&v("5.0.7")));
        assert!(!r.is_satisfied_by(&v("5.1")));
        assert!(!r.is_satisfied_by(&v("5.0.0")));
    }

    #[test]
    fn test_pessimistic_on_prerelease_base() {
        let r = req("~> 6.0.0rc1");
        assert!(r.is_satisfied_by(&v("6.0.0.rc2")));
        assert!(r.is_satisfied_by(&v("6.0.3")));
        assert!(!r.is_satisfied_by(&v("6.1.0")));
        assert!(!r.is_satisfied_by(&v("6.0.0.beta1")));
    }

    #[test]
    fn test_comparisons() {
        assert!(req(">= 4.2").is_satisfied_by(&v("5.0")));
        assert!(!req("> 5.0").is_satisfied_by(&v("5.0")));
        assert!(req("<= 5.0").is_satisfied_by(&v("5.0.0")));
        assert!(!req("< 5.0").is_satisfied_by(&v("5.0")));
        assert!(req("= 5.0.0").is_satisfied_by(&v("5.0")));
        assert!(!req("!= 5.0").is_satisfied_by(&v("5.0.0")));
    }

    #[test]
    fn test_compound() {
        let r = req(">= 4.1, < 5.1");
        assert!(r.is_satisfied_by(&v("4.2")));
        assert!(r.is_satisfied_by(&v("5.0")));
        assert!(!r.is_satisfied_by(&v("5.1")));
        assert!(!r.is_satisfied_by(&v("4.0")));
        assert_eq!(r.constraints().len(), 2);
    }

    #[test]
    fn test_caret_follows_cargo_semantics() {
        let r = req("^5.1");
        assert!(r.is_satisfied_by(&v("5.1")));
        assert!(r.is_satisfied_by(&v("5.9.2")));
        assert!(!r.is_satisfied_by(&v("6.0")));
        assert!(!r.is_satisfied_by(&v("5.0")));

        let zero = req("^0.2.3");
        assert!(zero.is_satisfied_by(&v("0.2.9")));
        assert!(!zero.is_satisfied_by(&v("0.3.0")));
    }

    #[test]
    fn test_tilde_follows_cargo_semantics() {
        let r = req("~5.1.2");
        assert!(r.is_satisfied_by(&v("5.1.9")));
        assert!(!r.is_satisfied_by(&v("5.2.0")));

        let minor = req("~5");
        assert!(minor.is_satisfied_by(&v("5.8")));
        assert!(!minor.is_satisfied_by(&v("6.0")));
    }

    #[test]
    fn test_display_keeps_written_form() {
        assert_eq!(req(">= 4.1, < 5.1").to_string(), ">= 4.1, < 5.1");
        let dep = RuntimeRequirement::new("railties", req(">= 4.1.0"));
        assert_eq!(dep.to_string(), "railties (>= 4.1.0)");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&req("~> 5.0")).unwrap();
        assert_eq!(json, "\"~> 5.0\"");
        let parsed: Requirement = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, req("~> 5.0"));
    }
}
