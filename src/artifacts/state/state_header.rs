use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::state::{SIGNATURE, VERSION};
use anyhow::anyhow;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StateHeader {
    pub marker: String,
    pub version: u32,
    pub branches_count: u32,
    pub added_count: u32,
    pub removed_count: u32,
}

impl StateHeader {
    pub fn with_counts(branches_count: u32, added_count: u32, removed_count: u32) -> Self {
        StateHeader::new(
            SIGNATURE.to_string(),
            VERSION,
            branches_count,
            added_count,
            removed_count,
        )
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.marker != SIGNATURE {
            return Err(anyhow!("Invalid state file signature"));
        }

        if self.version != VERSION {
            return Err(anyhow!("Unsupported state file version: {}", self.version));
        }

        Ok(())
    }
}

impl Packable for StateHeader {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::new();
        bytes.write_all(self.marker.as_bytes())?;
        bytes.write_u32::<NetworkEndian>(self.version)?;
        bytes.write_u32::<NetworkEndian>(self.branches_count)?;
        bytes.write_u32::<NetworkEndian>(self.added_count)?;
        bytes.write_u32::<NetworkEndian>(self.removed_count)?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for StateHeader {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut marker = [0u8; 4];
        reader
            .read_exact(&mut marker)
            .map_err(|_| anyhow!("Invalid state header size"))?;

        let marker = String::from_utf8(marker.to_vec())
            .map_err(|_| anyhow!("Invalid marker in state header"))?;

        Ok(StateHeader {
            marker,
            version: reader.read_u32::<NetworkEndian>()?,
            branches_count: reader.read_u32::<NetworkEndian>()?,
            added_count: reader.read_u32::<NetworkEndian>()?,
            removed_count: reader.read_u32::<NetworkEndian>()?,
        })
    }
}
