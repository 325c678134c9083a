//! Release catalog: published release metadata per gem
//!
//! The catalog is a JSON object mapping gem names to the releases shaped like
//! the RubyGems versions API (https://rubygems.org/api/v1/versions/{gem}.json),
//! with runtime dependencies attached:
//!
//! ```json
//! {
//!   "devise": [
//!     {
//!       "number": "4.7.1",
//!       "created_at": "2019-09-05T15:39:42.000Z",
//!       "prerelease": false,
//!       "dependencies": {
//!         "runtime": [{ "name": "railties", "requirements": ">= 4.1.0" }]
//!       }
//!     }
//!   ]
//! }
//! ```

use crate::domain::{GemVersion, Release, Requirement, RuntimeRequirement};
use crate::error::CatalogError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// One release entry as stored in the catalog file
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    number: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    dependencies: CatalogDependencies,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogDependencies {
    #[serde(default)]
    runtime: Vec<CatalogRequirement>,
}

#[derive(Debug, Deserialize)]
struct CatalogRequirement {
    name: String,
    #[serde(default)]
    requirements: String,
}

/// Published releases of every known gem, oldest first
#[derive(Debug, Clone, Default)]
pub struct ReleaseCatalog {
    gems: HashMap<String, Vec<CatalogRelease>>,
}

/// A release plus its prerelease flag from the registry
#[derive(Debug, Clone)]
struct CatalogRelease {
    release: Release,
    prerelease: bool,
}

impl ReleaseCatalog {
    /// An empty catalog: every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON content
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, Vec<CatalogEntry>> =
            serde_json::from_str(content).map_err(|e| CatalogError::JsonParseError {
                message: e.to_string(),
            })?;

        let mut gems = HashMap::with_capacity(raw.len());
        for (name, entries) in raw {
            let mut releases: Vec<CatalogRelease> = Vec::with_capacity(entries.len());
            for entry in entries {
                let release = entry_to_release(&name, &entry)?;
                // Registries list one entry per platform; keep the first
                if releases
                    .iter()
                    .any(|r| r.release.version == release.version)
                {
                    continue;
                }
                releases.push(CatalogRelease {
                    prerelease: entry.prerelease || release.version.is_prerelease(),
                    release,
                });
            }
            releases.sort_by(|a, b| a.release.version.cmp(&b.release.version));
            gems.insert(name, releases);
        }

        Ok(Self { gems })
    }

    /// Read and parse a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::not_found(path));
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::read_error(path, e))?;
        Self::from_json(&content)
    }

    /// Adds a release (used when building catalogs in code)
    pub fn insert(&mut self, release: Release) {
        let prerelease = release.version.is_prerelease();
        let releases = self.gems.entry(release.name.clone()).or_default();
        releases.retain(|r| r.release.version != release.version);
        releases.push(CatalogRelease {
            release,
            prerelease,
        });
        releases.sort_by(|a, b| a.release.version.cmp(&b.release.version));
    }

    /// Newest release that is not a prerelease
    pub fn latest(&self, name: &str) -> Option<&Release> {
        self.gems
            .get(name)?
            .iter()
            .rev()
            .find(|r| !r.prerelease)
            .map(|r| &r.release)
    }

    /// A specific release
    pub fn find(&self, name: &str, version: &GemVersion) -> Option<&Release> {
        self.gems
            .get(name)?
            .iter()
            .find(|r| &r.release.version == version)
            .map(|r| &r.release)
    }

    /// All releases of a gem that are not prereleases, oldest first
    pub fn releases(&self, name: &str) -> Vec<&Release> {
        self.gems
            .get(name)
            .map(|releases| {
                releases
                    .iter()
                    .filter(|r| !r.prerelease)
                    .map(|r| &r.release)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of gems in the catalog
    pub fn len(&self) -> usize {
        self.gems.len()
    }

    /// Returns true if the catalog knows no gems
    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }
}

fn entry_to_release(name: &str, entry: &CatalogEntry) -> Result<Release, CatalogError> {
    let version =
        GemVersion::parse(&entry.number).map_err(|e| CatalogError::invalid_entry(name, e))?;

    let requirements = entry
        .dependencies
        .runtime
        .iter()
        .map(|dep| {
            Requirement::parse(&dep.requirements)
                .map(|req| RuntimeRequirement::new(&dep.name, req))
                .map_err(|e| CatalogError::invalid_entry(name, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut release = Release::new(name, version);
    release.released_at = entry.created_at;
    release.requirements = requirements;
    Ok(release)
}
