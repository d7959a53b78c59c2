//! Gitlet: a miniature version-control system
//!
//! - `areas`: on-disk components (object database, repository state, workspace)
//! - `artifacts`: data structures and algorithms operating on those components
//! - `commands`: user-facing operations, implemented as `Repository` methods
//! - `errors`: user-facing failure taxonomy

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

/// Name of the repository metadata directory
pub const GITLET_DIR: &str = ".gitlet";
