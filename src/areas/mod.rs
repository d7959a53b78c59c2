//! Repository components
//!
//! - `database`: content-addressed object store under `.gitlet/objects`
//! - `index`: staging area for the next commit
//! - `refs`: branch table and HEAD
//! - `state`: persistence of refs and index in `.gitlet/state`
//! - `repository`: coordinates the components for a single command
//! - `workspace`: working tree file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod state;
pub mod workspace;
