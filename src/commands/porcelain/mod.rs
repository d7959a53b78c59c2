//! User-facing commands
//!
//! - `init`: create the repository and its root commit
//! - `add`, `rm`: stage files for the next commit
//! - `commit`: record the staged snapshot
//! - `log`: `log`, `global-log` and `find`
//! - `status`: branches, staging area and working tree changes
//! - `checkout`: restore files or switch branches
//! - `branch`: create and remove branches
//! - `reset`: move the current branch to another commit
//! - `merge`: three-way merge of another branch

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
