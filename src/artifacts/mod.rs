//! Version control data structures and algorithms
//!
//! - `branch`: branch names and commit id parsing
//! - `checkout`: working tree migrations and untracked file conflicts
//! - `diff`: tree to tree comparison
//! - `log`: commit history traversal
//! - `merge`: split point search and three-way resolution
//! - `objects`: stored object types (blob, tree, commit)
//! - `state`: binary format of the refs and staging area file
//! - `status`: working tree status inspection

pub mod branch;
pub mod checkout;
pub mod diff;
pub mod log;
pub mod merge;
pub mod objects;
pub mod state;
pub mod status;
