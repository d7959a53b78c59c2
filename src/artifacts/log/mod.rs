//! Commit history traversal
//!
//! - `rev_list`: lazy first-parent history used by `log`
//! - `commit_graph`: parent, ancestry and split point queries, plus the walk
//!   over every commit reachable from the branch tips

pub mod commit_graph;
pub mod rev_list;
