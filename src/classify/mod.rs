//! Compatibility classification of installed dependencies
//!
//! This module provides:
//! - Framework requirement checks for a release against a target version
//! - The four-way classification of an installed dependency
//! - The compatibility and outdated reports built on top of them

mod installed;
mod report;

pub use installed::InstalledDependency;
pub use report::{CompatibilityReport, IncompatibleDependency, OutdatedDependency, OutdatedReport};

use crate::domain::{
    ClassificationState, DependencyEntity, FrameworkFamily, GemVersion, Release,
    RuntimeRequirement,
};
use crate::index::DependencyIndex;
use std::fmt;

/// A framework requirement that the target version does not satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsatisfied<'a> {
    /// A declared requirement on a framework package
    Requirement(&'a RuntimeRequirement),
    /// Nothing is known about the dependency (no release found)
    Unknown,
}

impl fmt::Display for Unsatisfied<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsatisfied::Requirement(requirement) => write!(f, "{}", requirement),
            Unsatisfied::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classifies installed dependencies against a framework version
pub struct Classifier<'a> {
    index: &'a dyn DependencyIndex,
    family: FrameworkFamily,
}

impl<'a> Classifier<'a> {
    /// Create a classifier for the Rails family
    pub fn new(index: &'a dyn DependencyIndex) -> Self {
        Self {
            index,
            family: FrameworkFamily::RAILS,
        }
    }

    /// Every installed dependency, ready for memoized latest lookups
    pub fn installed(&self) -> Vec<InstalledDependency> {
        self.index
            .list_all()
            .into_iter()
            .map(InstalledDependency::from)
            .collect()
    }

    /// Framework requirements of `entity` not satisfied by `framework_version`
    ///
    /// An empty result means the entity is compatible. `NotFound` yields a
    /// single `Unknown` entry, so it is never compatible.
    pub fn unsatisfied_framework_requirements<'e>(
        &self,
        entity: &'e DependencyEntity,
        framework_version: &GemVersion,
    ) -> Vec<Unsatisfied<'e>> {
        match entity {
            DependencyEntity::Found(release) => self
                .unsatisfied_release_requirements(release, framework_version)
                .into_iter()
                .map(Unsatisfied::Requirement)
                .collect(),
            DependencyEntity::NotFound => vec![Unsatisfied::Unknown],
        }
    }

    /// Returns true if no framework requirement of `entity` is unsatisfied
    pub fn is_compatible(&self, entity: &DependencyEntity, framework_version: &GemVersion) -> bool {
        self.unsatisfied_framework_requirements(entity, framework_version)
            .is_empty()
    }

    /// Same check as [`Self::is_compatible`] for a release
    pub fn is_release_compatible(&self, release: &Release, framework_version: &GemVersion) -> bool {
        self.unsatisfied_release_requirements(release, framework_version)
            .is_empty()
    }

    /// Classify an installed dependency; first match wins
    pub fn classify(
        &self,
        dependency: &InstalledDependency,
        framework_version: &GemVersion,
    ) -> ClassificationState {
        if self.is_release_compatible(dependency.release(), framework_version) {
            return ClassificationState::Compatible;
        }

        let latest = dependency.latest_version(self.index);
        if self.is_compatible(latest, framework_version) {
            ClassificationState::LatestCompatible
        } else if latest.is_not_found() {
            ClassificationState::NoNewVersion
        } else {
            ClassificationState::Incompatible
        }
    }

    /// Newest release after the installed one that is compatible
    pub fn latest_compatible_release(
        &self,
        dependency: &InstalledDependency,
        framework_version: &GemVersion,
    ) -> Option<Release> {
        self.index
            .releases_for(dependency.name())
            .into_iter()
            .filter(|release| &release.version > dependency.version())
            .filter(|release| self.is_release_compatible(release, framework_version))
            .max_by(|a, b| a.version.cmp(&b.version))
    }

    fn unsatisfied_release_requirements<'e>(
        &self,
        release: &'e Release,
        framework_version: &GemVersion,
    ) -> Vec<&'e RuntimeRequirement> {
        release
            .requirements
            .iter()
            .filter(|dep| self.family.contains(&dep.name))
            .filter(|dep| !dep.requirement.is_satisfied_by(framework_version))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{DependencyEntity, Release};
    use crate::index::DependencyIndex;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory index that records latest-release lookups
    #[derive(Default)]
    pub struct FakeIndex {
        installed: Vec<Release>,
        latest: HashMap<String, Release>,
        releases: HashMap<String, Vec<Release>>,
        lookups: RefCell<Vec<String>>,
    }

    impl FakeIndex {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_installed(mut self, release: Release) -> Self {
            self.installed.push(release);
            self
        }

        pub fn with_latest(mut self, release: Release) -> Self {
            self.latest.insert(release.name.clone(), release);
            self
        }

        pub fn with_release(mut self, release: Release) -> Self {
            self.releases
                .entry(release.name.clone())
                .or_default()
                .push(release);
            self
        }

        pub fn lookups(&self, name: &str) -> usize {
            self.lookups.borrow().iter().filter(|n| *n == name).count()
        }

        pub fn total_lookups(&self) -> usize {
            self.lookups.borrow().len()
        }
    }

    impl DependencyIndex for FakeIndex {
        fn list_all(&self) -> Vec<Release> {
            self.installed.clone()
        }

        fn latest_for(&self, name: &str) -> DependencyEntity {
            self.lookups.borrow_mut().push(name.to_string());
            self.latest
                .get(name)
                .cloned()
                .map(DependencyEntity::Found)
                .unwrap_or(DependencyEntity::NotFound)
        }

        fn releases_for(&self, name: &str) -> Vec<Release> {
            self.releases.get(name).cloned().unwrap_or_default()
        }
    }
}
