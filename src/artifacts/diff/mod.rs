//! Snapshot comparison
//!
//! - `tree_diff`: per-path changes between two flat trees

pub mod tree_diff;
