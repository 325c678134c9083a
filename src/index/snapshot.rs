//! Index over a lockfile snapshot and a release catalog

use super::catalog::ReleaseCatalog;
use super::lockfile::{read_lockfile, LockedSpec};
use super::DependencyIndex;
use crate::domain::{DependencyEntity, Release};
use crate::error::AppError;
use std::path::Path;

/// Installed gems from a lockfile, with release metadata from a catalog
#[derive(Debug, Clone, Default)]
pub struct SnapshotIndex {
    installed: Vec<Release>,
    catalog: ReleaseCatalog,
}

impl SnapshotIndex {
    /// Creates an index from already-built parts
    pub fn new(installed: Vec<Release>, catalog: ReleaseCatalog) -> Self {
        Self { installed, catalog }
    }

    /// Builds the index from locked specs, dating them from the catalog
    pub fn from_locked(specs: Vec<LockedSpec>, catalog: ReleaseCatalog) -> Self {
        let installed = specs
            .into_iter()
            .map(|spec| {
                let released_at = catalog
                    .find(&spec.name, &spec.version)
                    .and_then(|r| r.released_at);
                let mut release = Release::new(spec.name, spec.version).with_source(spec.source);
                release.released_at = released_at;
                release.requirements = spec.requirements;
                release
            })
            .collect();
        Self::new(installed, catalog)
    }

    /// Loads a Gemfile.lock and a catalog file
    pub fn load(lockfile: &Path, catalog: &Path) -> Result<Self, AppError> {
        let specs = read_lockfile(lockfile)?;
        let catalog = ReleaseCatalog::load(catalog)?;
        tracing::debug!(
            installed = specs.len(),
            catalog_gems = catalog.len(),
            "loaded dependency snapshot"
        );
        Ok(Self::from_locked(specs, catalog))
    }

}

impl DependencyIndex for SnapshotIndex {
    fn list_all(&self) -> Vec<Release> {
        self.installed.clone()
    }

    fn latest_for(&self, name: &str) -> DependencyEntity {
        match self.catalog.latest(name) {
            Some(release) => DependencyEntity::Found(release.clone()),
            None => {
                tracing::debug!(gem = name, "no published release found");
                DependencyEntity::NotFound
            }
        }
    }

    fn releases_for(&self, name: &str) -> Vec<Release> {
        self.catalog.releases(name).into_iter().cloned().collect()
    }
}
