//! Run settings
//!
//! Settings are layered: built-in defaults, then an optional TOML config file,
//! then CLI flags. The config file is `bundle-report.toml` in the working
//! directory unless `--config` points elsewhere:
//!
//! ```toml
//! lockfile = "Gemfile.lock"
//! catalog = ".bundle-report/releases.json"
//! rails_version = "6.0"
//! include_rails_gems = false
//! color = true
//! ```

use crate::cli::CliArgs;
use crate::domain::GemVersion;
use crate::error::ConfigError;
use crate::output::OutputFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Target Rails version when none is configured
pub const DEFAULT_RAILS_VERSION: &str = "5.0";

/// Default lockfile location
pub const DEFAULT_LOCKFILE: &str = "Gemfile.lock";

/// Default release catalog location
pub const DEFAULT_CATALOG: &str = ".bundle-report/releases.json";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "bundle-report.toml";

/// Contents of the TOML config file; every key is optional
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub lockfile: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub rails_version: Option<String>,
    pub include_rails_gems: Option<bool>,
    pub color: Option<bool>,
}

impl FileConfig {
    /// Parse config file content
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content, path)
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub lockfile: PathBuf,
    pub catalog: PathBuf,
    pub rails_version: String,
    pub include_rails_gems: bool,
    pub format: OutputFormat,
    pub color: bool,
}

impl Settings {
    /// Resolve settings from CLI arguments and the config file, if any
    ///
    /// An explicit `--config` must exist; the default config file is optional.
    pub fn resolve(args: &CliArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    tracing::debug!(path = %default.display(), "using config file");
                    FileConfig::load(default)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Ok(Self::merge(args, file))
    }

    /// Apply CLI flags over config file values over defaults
    pub fn merge(args: &CliArgs, file: FileConfig) -> Self {
        Self {
            lockfile: args
                .lockfile
                .clone()
                .or(file.lockfile)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCKFILE)),
            catalog: args
                .catalog
                .clone()
                .or(file.catalog)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG)),
            rails_version: args
                .rails_version
                .clone()
                .or(file.rails_version)
                .unwrap_or_else(|| DEFAULT_RAILS_VERSION.to_string()),
            include_rails_gems: args.include_rails_gems || file.include_rails_gems.unwrap_or(false),
            format: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            color: !args.no_color && file.color.unwrap_or(true),
        }
    }

    /// Parse the target framework version
    pub fn framework_version(&self) -> Result<GemVersion, ConfigError> {
        GemVersion::parse(&self.rails_version)
            .map_err(|_| ConfigError::malformed_framework_version(&self.rails_version))
    }
}
