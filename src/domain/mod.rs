//! Core domain models for bundle-report
//!
//! This module contains the fundamental types used throughout the application:
//! - Gem versions and the requirements gems declare on each other
//! - Dependency entities (a release, or the "not found" marker)
//! - Framework families and compatibility states

mod classification;
mod entity;
mod framework;
mod requirement;
mod version;

pub use classification::ClassificationState;
pub use entity::{format_age, DependencyEntity, Release, SourceOrigin, NOT_FOUND_LABEL};
pub use framework::{FrameworkFamily, RAILS_GEMS};
pub use requirement::{Constraint, ConstraintKind, Requirement, RuntimeRequirement};
pub use version::GemVersion;
