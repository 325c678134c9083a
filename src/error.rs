//! Application error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: Malformed versions and requirement strings
//! - LockfileError: Issues reading or parsing Gemfile.lock
//! - CatalogError: Issues reading or parsing the release catalog
//! - ConfigError: Issues with CLI or config file settings
//! - ReportError: Conditions that make a report undefined

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Lockfile related errors
    #[error(transparent)]
    Lockfile(#[from] LockfileError),

    /// Release catalog related errors
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Report computation errors
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Errors raised while parsing versions and requirements
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Version string is not a valid gem version
    #[error("malformed version '{value}'")]
    Malformed { value: String },

    /// Requirement string could not be parsed
    #[error("invalid requirement '{requirement}': {message}")]
    InvalidRequirement {
        requirement: String,
        message: String,
    },
}

/// Errors related to Gemfile.lock handling
#[derive(Error, Debug)]
pub enum LockfileError {
    /// Lockfile not found
    #[error("lockfile not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read lockfile
    #[error("failed to read lockfile {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A spec line could not be parsed
    #[error("failed to parse lockfile at line {line}: {message}")]
    ParseError { line: usize, message: String },
}

/// Errors related to the release catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file not found
    #[error("release catalog not found: {path} (pass --catalog to point at one)")]
    NotFound { path: PathBuf },

    /// Failed to read catalog file
    #[error("failed to read release catalog {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse release catalog JSON: {message}")]
    JsonParseError { message: String },

    /// A release entry carries an unusable version or requirement
    #[error("invalid catalog entry for '{gem}': {source}")]
    InvalidEntry {
        gem: String,
        #[source]
        source: VersionError,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Target framework version is not a valid version
    #[error("malformed framework version '{value}': expected a version like '5.0' or '6.1.4'")]
    MalformedFrameworkVersion { value: String },

    /// Failed to read config file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },
}

/// Errors that make a report undefined
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReportError {
    /// The index listed no installed dependencies
    #[error("no installed dependencies found; cannot compute the out-of-date percentage")]
    EmptyDependencySet,
}

impl VersionError {
    /// Creates a new Malformed error
    pub fn malformed(value: impl Into<String>) -> Self {
        VersionError::Malformed {
            value: value.into(),
        }
    }

    /// Creates a new InvalidRequirement error
    pub fn invalid_requirement(requirement: impl Into<String>, message: impl Into<String>) -> Self {
        VersionError::InvalidRequirement {
            requirement: requirement.into(),
            message: message.into(),
        }
    }
}

impl LockfileError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        LockfileError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LockfileError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(line: usize, message: impl Into<String>) -> Self {
        LockfileError::ParseError {
            line,
            message: message.into(),
        }
    }
}

impl CatalogError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        CatalogError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new InvalidEntry error
    pub fn invalid_entry(gem: impl Into<String>, source: VersionError) -> Self {
        CatalogError::InvalidEntry {
            gem: gem.into(),
            source,
        }
    }
}

impl ConfigError {
    /// Creates a new MalformedFrameworkVersion error
    pub fn malformed_framework_version(value: impl Into<String>) -> Self {
        ConfigError::MalformedFrameworkVersion {
            value: value.into(),
        }
    }
}
