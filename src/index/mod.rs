//! Dependency index: where installed gems and their releases come from
//!
//! This module provides:
//! - The `DependencyIndex` trait consumed by the classifier
//! - Gemfile.lock parsing for the installed set
//! - A release catalog for dates and latest releases
//! - `SnapshotIndex`, combining both

mod catalog;
mod lockfile;
mod snapshot;

pub use catalog::ReleaseCatalog;
pub use lockfile::{parse_lockfile, read_lockfile, LockedSpec};
pub use snapshot::SnapshotIndex;

use crate::domain::{DependencyEntity, Release};

/// Read-only access to the installed dependency set and published releases
pub trait DependencyIndex {
    /// Every installed dependency, in a stable order
    fn list_all(&self) -> Vec<Release>;

    /// Newest published release of `name`, or `NotFound`
    ///
    /// May be expensive; callers memoize the result per dependency.
    fn latest_for(&self, name: &str) -> DependencyEntity;

    /// Every published release of `name`, oldest first
    ///
    /// Indexes that only know the latest release may leave this empty.
    fn releases_for(&self, _name: &str) -> Vec<Release> {
        Vec::new()
    }
}
