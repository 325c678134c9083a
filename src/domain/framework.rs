//! Framework families: packages released together under one version

use serde::Serialize;
use std::fmt;

/// Rails and the first-party gems released in lockstep with it
pub const RAILS_GEMS: &[&str] = &[
    "rails",
    "activemodel",
    "activerecord",
    "actionmailer",
    "actioncable",
    "actionpack",
    "actionview",
    "activejob",
    "activestorage",
    "activesupport",
    "railties",
];

/// A closed set of package names treated as one compatibility unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameworkFamily {
    name: &'static str,
    members: &'static [&'static str],
}

impl FrameworkFamily {
    /// The Rails family
    pub const RAILS: FrameworkFamily = FrameworkFamily {
        name: "Rails",
        members: RAILS_GEMS,
    };

    /// Display name of the framework
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Package names belonging to the family
    pub fn members(&self) -> &'static [&'static str] {
        self.members
    }

    /// Returns true if `package` belongs to the family
    pub fn contains(&self, package: &str) -> bool {
        self.members.contains(&package)
    }
}

impl Default for FrameworkFamily {
    fn default() -> Self {
        Self::RAILS
    }
}

impl fmt::Display for FrameworkFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
