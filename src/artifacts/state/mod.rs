//! Binary format of the `.gitlet/state` file
//!
//! ```text
//! Header (20 bytes):
//!   - Signature: "GLET" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Branch count, added count, removed count (4 bytes each)
//!
//! Body:
//!   - HEAD branch name
//!   - Branches: name + 20-byte commit id, sorted by name
//!   - Added: path + 20-byte blob id, sorted by path
//!   - Removed: path, sorted
//!
//! Checksum (20 bytes):
//!   - SHA-1 of all preceding bytes
//! ```
//!
//! Strings are prefixed by their byte length as a big-endian u16.

pub mod checksum;
pub mod state_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the state header in bytes
pub const HEADER_SIZE: usize = 20;

/// Magic signature identifying state files
pub const SIGNATURE: &str = "GLET";

/// State file format version
pub const VERSION: u32 = 1;
