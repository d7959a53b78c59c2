//! Object identifier (SHA-1 hash)
//!
//! Ids are 40 lowercase hex characters. On disk an object lives at
//! `.gitlet/objects/<first 2 chars>/<remaining 38 chars>`. In trees and in the
//! state file ids are written as 20 raw bytes.

use crate::artifacts::objects::{OBJECT_ID_BYTES, OBJECT_ID_LENGTH, SHORT_ID_LENGTH};
use std::io;
use std::path::PathBuf;

/// Shortest prefix accepted for short-id lookup
pub const MIN_PREFIX_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate a full 40-character id
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            anyhow::bail!("Invalid object ID length: {}", id.len());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("Invalid object ID characters: {id}");
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Whether `prefix` can name an object by abbreviation
    pub fn is_valid_prefix(prefix: &str) -> bool {
        (MIN_PREFIX_LENGTH..=OBJECT_ID_LENGTH).contains(&prefix.len())
            && prefix.chars().all(|c| c.is_ascii_hexdigit())
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(&prefix.to_ascii_lowercase())
    }

    /// Write the id as 20 raw bytes
    pub fn write_bytes_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let mut raw = [0u8; OBJECT_ID_BYTES];
        for (i, byte) in raw.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&self.0[i * 2..i * 2 + 2], 16)?;
        }

        writer.write_all(&raw)?;
        Ok(())
    }

    /// Read an id from 20 raw bytes
    pub fn read_bytes_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut raw = [0u8; OBJECT_ID_BYTES];
        reader.read_exact(&mut raw)?;

        let hex = raw.iter().map(|byte| format!("{byte:02x}")).collect();
        Self::try_parse(hex)
    }

    /// Object path relative to the objects directory, e.g. `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    pub fn to_short_oid(&self) -> &str {
        &self.0[..SHORT_ID_LENGTH]
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
