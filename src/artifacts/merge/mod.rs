//! Three-way merge support
//!
//! - `lca_finder`: split point (lowest common ancestor) of two commits
//! - `resolve`: per-path three-way resolution of split, current and other trees
//! - `conflict`: conflict marker formatting

pub mod conflict;
pub mod lca_finder;
pub mod resolve;
