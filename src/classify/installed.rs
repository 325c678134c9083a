//! An installed dependency with its memoized latest release

use crate::domain::{DependencyEntity, GemVersion, Release};
use crate::index::DependencyIndex;
use std::cell::OnceCell;

/// An installed gem plus a compute-once cache of its newest release
///
/// The index is queried for the latest release at most once over the
/// lifetime of the value, however many times it is asked.
#[derive(Debug, Clone)]
pub struct InstalledDependency {
    release: Release,
    latest: OnceCell<DependencyEntity>,
}

impl InstalledDependency {
    /// Wraps an installed release; nothing is looked up yet
    pub fn new(release: Release) -> Self {
        Self {
            release,
            latest: OnceCell::new(),
        }
    }

    /// The installed release
    pub fn release(&self) -> &Release {
        &self.release
    }

    /// Gem name
    pub fn name(&self) -> &str {
        &self.release.name
    }

    /// Installed version
    pub fn version(&self) -> &GemVersion {
        &self.release.version
    }

    /// Newest published release, fetched from `index` on first use
    pub fn latest_version(&self, index: &dyn DependencyIndex) -> &DependencyEntity {
        self.latest
            .get_or_init(|| index.latest_for(&self.release.name))
    }

    /// The latest release if it has already been resolved
    pub fn cached_latest(&self) -> Option<&DependencyEntity> {
        self.latest.get()
    }

    /// Returns true if the installed version is the newest release
    pub fn is_up_to_date(&self, index: &dyn DependencyIndex) -> bool {
        match self.latest_version(index) {
            DependencyEntity::Found(latest) => latest.version == self.release.version,
            DependencyEntity::NotFound => false,
        }
    }
}

impl From<Release> for InstalledDependency {
    fn from(release: Release) -> Self {
        Self::new(release)
    }
}
