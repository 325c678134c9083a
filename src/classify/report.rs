//! Compatibility and outdated reports
//!
//! Both reports are plain data: grouping, sorting and counting happen here,
//! formatting is left to the output module.

use super::{Classifier, InstalledDependency};
use crate::domain::{format_age, ClassificationState, DependencyEntity, GemVersion, SourceOrigin};
use crate::error::ReportError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One installed dependency that does not work with the target version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompatibleDependency {
    /// Gem name
    pub name: String,
    /// Installed version
    pub version: GemVersion,
    /// Origin of the installed gem
    pub source: SourceOrigin,
    /// Classification against the target version
    pub state: ClassificationState,
    /// Newest published release, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<GemVersion>,
    /// Newest release newer than the installed one that is compatible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_compatible_version: Option<GemVersion>,
    /// Framework requirements the target version does not satisfy
    pub unsatisfied: Vec<String>,
}

impl IncompatibleDependency {
    /// Returns true if the gem is pinned to a source-control reference
    pub fn is_sourced_from_vcs(&self) -> bool {
        self.source == SourceOrigin::Vcs
    }
}

/// Incompatible dependencies grouped by classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityReport {
    /// Framework display name
    pub framework: String,
    /// Target framework version
    pub framework_version: GemVersion,
    /// Fixed by upgrading to the latest release
    pub latest_compatible: Vec<IncompatibleDependency>,
    /// Latest release is not compatible either
    pub incompatible: Vec<IncompatibleDependency>,
    /// No published release was found
    pub no_new_version: Vec<IncompatibleDependency>,
}

impl CompatibilityReport {
    /// Total number of incompatible dependencies across all buckets
    pub fn total_incompatible(&self) -> usize {
        self.latest_compatible.len() + self.incompatible.len() + self.no_new_version.len()
    }

    /// Entries of one bucket; `Compatible` is always empty
    pub fn bucket(&self, state: ClassificationState) -> &[IncompatibleDependency] {
        match state {
            ClassificationState::Compatible => &[],
            ClassificationState::LatestCompatible => &self.latest_compatible,
            ClassificationState::Incompatible => &self.incompatible,
            ClassificationState::NoNewVersion => &self.no_new_version,
        }
    }

    /// Returns true if every dependency is compatible
    pub fn is_empty(&self) -> bool {
        self.total_incompatible() == 0
    }
}

/// One dependency whose installed version is not the newest release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutdatedDependency {
    /// Gem name
    pub name: String,
    /// Installed version
    pub version: GemVersion,
    /// Release date of the installed version
    pub released_at: Option<DateTime<Utc>>,
    /// Origin of the installed gem
    pub source: SourceOrigin,
    /// Newest published release
    pub latest: DependencyEntity,
}

impl OutdatedDependency {
    /// Release date of the installed version for display
    pub fn age(&self) -> String {
        format_age(self.released_at)
    }
}

/// Outdated dependencies, oldest release first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutdatedReport {
    /// Dependencies that are not on their newest release
    pub out_of_date: Vec<OutdatedDependency>,
    /// Number of installed dependencies
    pub total: usize,
    /// Installed dependencies pinned to a source-control reference
    pub sourced_from_vcs: usize,
    /// Rounded share of outdated dependencies, 0-100
    pub percentage_out_of_date: u32,
}

impl Classifier<'_> {
    /// Group installed dependencies that do not work with `framework_version`
    ///
    /// Framework members themselves are left out unless
    /// `include_framework_members` is set. Entries are ordered with those
    /// fixed by an upgrade first, then by name.
    pub fn compatibility_report(
        &self,
        framework_version: &GemVersion,
        include_framework_members: bool,
    ) -> CompatibilityReport {
        let installed = self.installed();

        let mut incompatible: Vec<(ClassificationState, &InstalledDependency)> = installed
            .iter()
            .filter(|dep| include_framework_members || !self.family.contains(dep.name()))
            .filter(|dep| !self.is_release_compatible(dep.release(), framework_version))
            .map(|dep| (self.classify(dep, framework_version), dep))
            .collect();

        incompatible.sort_by(|(state_a, a), (state_b, b)| {
            let rank = |state: &ClassificationState| u8::from(!state.is_fixable_by_upgrade());
            rank(state_a)
                .cmp(&rank(state_b))
                .then_with(|| a.name().cmp(b.name()))
        });

        let mut report = CompatibilityReport {
            framework: self.family.name().to_string(),
            framework_version: framework_version.clone(),
            latest_compatible: Vec::new(),
            incompatible: Vec::new(),
            no_new_version: Vec::new(),
        };

        for (state, dep) in incompatible {
            tracing::debug!(gem = dep.name(), state = %state, "incompatible gem");
            let entry = self.incompatible_entry(dep, state, framework_version);
            match state {
                ClassificationState::LatestCompatible => report.latest_compatible.push(entry),
                ClassificationState::Incompatible => report.incompatible.push(entry),
                ClassificationState::NoNewVersion => report.no_new_version.push(entry),
                ClassificationState::Compatible => {}
            }
        }

        tracing::debug!(
            framework_version = %framework_version,
            installed = installed.len(),
            incompatible = report.total_incompatible(),
            "built compatibility report"
        );

        report
    }

    /// List dependencies that are behind their newest release
    ///
    /// Fails with `EmptyDependencySet` when nothing is installed, since the
    /// out-of-date percentage is undefined then.
    pub fn outdated_report(&self) -> Result<OutdatedReport, ReportError> {
        let installed = self.installed();
        if installed.is_empty() {
            return Err(ReportError::EmptyDependencySet);
        }

        let mut out_of_date: Vec<OutdatedDependency> = installed
            .iter()
            .filter(|dep| !dep.is_up_to_date(self.index))
            .map(|dep| OutdatedDependency {
                name: dep.name().to_string(),
                version: dep.version().clone(),
                released_at: dep.release().released_at,
                source: dep.release().source,
                latest: dep.latest_version(self.index).clone(),
            })
            .collect();

        // Oldest first; undated releases go last
        out_of_date.sort_by_key(|dep| (dep.released_at.is_none(), dep.released_at));

        let total = installed.len();
        let sourced_from_vcs = installed
            .iter()
            .filter(|dep| dep.release().is_sourced_from_vcs())
            .count();
        let percentage_out_of_date =
            ((out_of_date.len() as f64 / total as f64) * 100.0).round() as u32;

        tracing::debug!(
            total,
            outdated = out_of_date.len(),
            sourced_from_vcs,
            "built outdated report"
        );

        Ok(OutdatedReport {
            out_of_date,
            total,
            sourced_from_vcs,
            percentage_out_of_date,
        })
    }

    fn incompatible_entry(
        &self,
        dep: &InstalledDependency,
        state: ClassificationState,
        framework_version: &GemVersion,
    ) -> IncompatibleDependency {
        let latest = dep.latest_version(self.index);
        let latest_compatible_version = match state {
            ClassificationState::LatestCompatible => latest.version().cloned(),
            ClassificationState::Incompatible => self
                .latest_compatible_release(dep, framework_version)
                .map(|release| release.version),
            ClassificationState::NoNewVersion | ClassificationState::Compatible => None,
        };
        let own = DependencyEntity::Found(dep.release().clone());

        IncompatibleDependency {
            name: dep.name().to_string(),
            version: dep.version().clone(),
            source: dep.release().source,
            state,
            latest_version: latest.version().cloned(),
            latest_compatible_version,
            unsatisfied: self
                .unsatisfied_framework_requirements(&own, framework_version)
                .iter()
                .map(|u| u.to_string())
                .collect(),
        }
    }
}
