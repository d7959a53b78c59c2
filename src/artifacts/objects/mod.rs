//! Object types stored in the content-addressed database
//!
//! - **Blob**: raw file content
//! - **Tree**: flat snapshot mapping repository-relative paths to blob ids
//! - **Commit**: tree id, parents and metadata
//!
//! Every object is framed as `<type> <size>\0<payload>` before hashing and storage.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in raw bytes
pub const OBJECT_ID_BYTES: usize = OBJECT_ID_LENGTH / 2;

/// Length of the abbreviated id shown in merge log lines
pub const SHORT_ID_LENGTH: usize = 7;
