//! bundle-report - Gemfile.lock outdated and Rails compatibility reports
//!
//! This library provides the pieces behind the `bundle-report` CLI:
//! - Reading installed gems from Gemfile.lock and releases from a JSON catalog
//! - Classifying gems against a target Rails version
//! - Building the outdated and compatibility reports
//! - Rendering reports as text or JSON

pub mod classify;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod index;
pub mod output;
