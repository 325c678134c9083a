//! Shared fixtures for the integration and end-to-end tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A Rails 4.2 app with gems in every compatibility bucket for Rails 5.0
pub const LOCKFILE: &str = r#"GIT
  remote: https://github.com/example/paperclip.git
  revision: 0123456789abcdef0123456789abcdef01234567
  specs:
    paperclip (4.3.7)
      activemodel (>= 3.2.0, < 5.0)
      activesupport (>= 3.2.0, < 5.0)
      mime-types

PATH
  remote: engines/billing
  specs:
    billing (0.1.0)
      rails (~> 4.2)

GEM
  remote: https://rubygems.org/
  specs:
    actionpack (4.2.11)
      actionview (= 4.2.11)
      rack (~> 1.6)
    devise (3.5.10)
      bcrypt (~> 3.0)
      railties (>= 3.2.6, < 5)
    kaminari (1.1.1)
      activesupport (>= 4.1.0)
    protected_attributes (1.1.4)
      activemodel (>= 4.0.1, < 5.0)
    rack (1.6.11)

PLATFORMS
  ruby

DEPENDENCIES
  billing!
  devise (~> 3.5)
  kaminari
  paperclip!
  protected_attributes
  rails (~> 4.2.11)

BUNDLED WITH
   1.17.3
"#;

/// Release metadata for the gems in `LOCKFILE`
pub const CATALOG: &str = r#"{
  "devise": [
    {
      "number": "4.7.1",
      "created_at": "2019-09-06T00:00:00Z",
      "prerelease": false,
      "dependencies": {
        "runtime": [
          { "name": "bcrypt", "requirements": "~> 3.0" },
          { "name": "railties", "requirements": ">= 4.1.0" }
        ]
      }
    },
    {
      "number": "3.5.10",
      "created_at": "2016-05-15T00:00:00Z",
      "prerelease": false,
      "dependencies": {
        "runtime": [
          { "name": "railties", "requirements": ">= 3.2.6, < 5" }
        ]
      }
    }
  ],
  "kaminari": [
    {
      "number": "1.1.1",
      "created_at": "2017-10-21T00:00:00Z",
      "dependencies": {
        "runtime": [
          { "name": "activesupport", "requirements": ">= 4.1.0" }
        ]
      }
    }
  ],
  "paperclip": [
    {
      "number": "6.1.0",
      "created_at": "2018-07-27T00:00:00Z",
      "dependencies": {
        "runtime": [
          { "name": "activemodel", "requirements": ">= 4.2.0" },
          { "name": "activesupport", "requirements": ">= 4.2.0" }
        ]
      }
    },
    {
      "number": "4.3.7",
      "created_at": "2016-08-01T00:00:00Z",
      "dependencies": {
        "runtime": [
          { "name": "activemodel", "requirements": ">= 3.2.0, < 5.0" }
        ]
      }
    }
  ],
  "protected_attributes": [
    {
      "number": "1.1.4",
      "created_at": "2017-03-22T00:00:00Z",
      "dependencies": {
        "runtime": [
          { "name": "activemodel", "requirements": ">= 4.0.1, < 5.0" }
        ]
      }
    }
  ],
  "rack": [
    { "number": "2.1.0.rc1", "created_at": "2019-12-01T00:00:00Z", "prerelease": true },
    { "number": "2.0.7", "created_at": "2019-04-02T00:00:00Z" },
    { "number": "1.6.11", "created_at": "2018-11-05T00:00:00Z" }
  ]
}"#;

/// A lockfile with no installed gems
pub const EMPTY_LOCKFILE: &str = "GEM\n  remote: https://rubygems.org/\n  specs:\n\nPLATFORMS\n  ruby\n";

/// Temp directory holding `Gemfile.lock` and `.bundle-report/releases.json`
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new(lockfile: &str, catalog: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        fs::write(dir.path().join("Gemfile.lock"), lockfile).unwrap();
        fs::create_dir_all(dir.path().join(".bundle-report")).unwrap();
        fs::write(dir.path().join(".bundle-report/releases.json"), catalog).unwrap();
        Self { dir }
    }

    pub fn sample() -> Self {
        Self::new(LOCKFILE, CATALOG)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn lockfile(&self) -> PathBuf {
        self.path().join("Gemfile.lock")
    }

    pub fn catalog(&self) -> PathBuf {
        self.path().join(".bundle-report/releases.json")
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}
