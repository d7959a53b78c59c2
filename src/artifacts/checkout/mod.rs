//! Replacing the working tree with another snapshot
//!
//! A checkout is planned as a `Migration` before anything is touched. The
//! plan lists files to write and files to delete, together with any untracked
//! files the move would clobber. Only a plan without conflicts is applied.

pub mod conflict;
pub mod migration;
