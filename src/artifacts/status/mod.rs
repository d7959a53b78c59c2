//! Working tree status
//!
//! - `file_change`: kinds of unstaged change
//! - `inspector`: compares on-disk files with expected blobs
//! - `status_info`: the four status classifications and their report

pub mod file_change;
pub mod inspector;
pub mod status_info;
