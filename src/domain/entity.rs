//! Dependency entities: an installed or published gem release, or the
//! terminal "not found" marker

use super::{GemVersion, Requirement, RuntimeRequirement};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown in place of a version when no release exists
pub const NOT_FOUND_LABEL: &str = "NOT FOUND";

/// Release date formatted like `Sep  1, 2015`, or `-` when unknown
pub fn format_age(released_at: Option<DateTime<Utc>>) -> String {
    released_at
        .map(|d| d.format("%b %e, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Where an installed gem comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    /// A published release from the gem registry
    #[default]
    Registry,
    /// Pinned to a source-control reference (a `GIT` lockfile source)
    Vcs,
    /// Loaded from a local path (a `PATH` lockfile source)
    Local,
}

/// Metadata of one gem release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Gem name
    pub name: String,
    /// Release version
    pub version: GemVersion,
    /// When the release was published, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
    /// Origin of the release
    pub source: SourceOrigin,
    /// Runtime dependencies declared by this release, in declaration order
    pub requirements: Vec<RuntimeRequirement>,
}

impl Release {
    /// Creates a registry release with no date and no requirements
    pub fn new(name: impl Into<String>, version: GemVersion) -> Self {
        Self {
            name: name.into(),
            version,
            released_at: None,
            source: SourceOrigin::Registry,
            requirements: Vec::new(),
        }
    }

    /// Sets the release date (builder pattern)
    pub fn with_released_at(mut self, released_at: DateTime<Utc>) -> Self {
        self.released_at = Some(released_at);
        self
    }

    /// Sets the source origin (builder pattern)
    pub fn with_source(mut self, source: SourceOrigin) -> Self {
        self.source = source;
        self
    }

    /// Appends a runtime requirement (builder pattern)
    pub fn with_requirement(mut self, name: impl Into<String>, requirement: Requirement) -> Self {
        self.requirements
            .push(RuntimeRequirement::new(name, requirement));
        self
    }

    /// Returns true if the gem is pinned to a source-control reference
    pub fn is_sourced_from_vcs(&self) -> bool {
        self.source == SourceOrigin::Vcs
    }

    /// Release date for display
    pub fn age(&self) -> String {
        format_age(self.released_at)
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// A release, or the marker for "no published release exists"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DependencyEntity {
    Found(Release),
    NotFound,
}

impl DependencyEntity {
    /// The release, if one was found
    pub fn release(&self) -> Option<&Release> {
        match self {
            DependencyEntity::Found(release) => Some(release),
            DependencyEntity::NotFound => None,
        }
    }

    /// The version, if one was found
    pub fn version(&self) -> Option<&GemVersion> {
        self.release().map(|r| &r.version)
    }

    /// Returns true for the not-found marker
    pub fn is_not_found(&self) -> bool {
        matches!(self, DependencyEntity::NotFound)
    }

    /// Version for display: the version or `NOT FOUND`
    pub fn version_label(&self) -> String {
        match self {
            DependencyEntity::Found(release) => release.version.to_string(),
            DependencyEntity::NotFound => NOT_FOUND_LABEL.to_string(),
        }
    }

    /// Release date for display; the marker has no age
    pub fn age(&self) -> String {
        match self {
            DependencyEntity::Found(release) => release.age(),
            DependencyEntity::NotFound => format_age(None),
        }
    }
}

impl From<Release> for DependencyEntity {
    fn from(release: Release) -> Self {
        DependencyEntity::Found(release)
    }
}
