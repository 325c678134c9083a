//! Compatibility states of an installed dependency against a framework version

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an installed dependency stands against a target framework version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationState {
    /// The installed version already works with the target version
    Compatible,
    /// The installed version does not, but the latest release does
    LatestCompatible,
    /// Neither the installed version nor the latest release works
    Incompatible,
    /// The installed version does not work and no release was found
    NoNewVersion,
}

impl ClassificationState {
    /// Returns true if upgrading to the latest release fixes the dependency
    pub fn is_fixable_by_upgrade(&self) -> bool {
        matches!(self, ClassificationState::LatestCompatible)
    }

    /// Snake-case label used in machine-readable output
    pub fn label(&self) -> &'static str {
        match self {
            ClassificationState::Compatible => "compatible",
            ClassificationState::LatestCompatible => "latest_compatible",
            ClassificationState::Incompatible => "incompatible",
            ClassificationState::NoNewVersion => "no_new_version",
        }
    }
}

impl fmt::Display for ClassificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationState::Compatible => write!(f, "compatible"),
            ClassificationState::LatestCompatible => write!(f, "latest version is compatible"),
            ClassificationState::Incompatible => write!(f, "no compatible version"),
            ClassificationState::NoNewVersion => write!(f, "no new version"),
        }
    }
}
