use crate::artifacts::objects::OBJECT_ID_BYTES;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::state::CHECKSUM_SIZE;
use anyhow::{Context, anyhow};
use byteorder::ByteOrder;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};
use std::ops::DerefMut;

/// Stream wrapper that hashes everything read or written through it
///
/// `S` is usually a `file_guard::FileGuard` holding the locked state file.
#[derive(Debug)]
pub struct Checksum<S> {
    stream: S,
    digest: Sha1,
}

impl<S> Checksum<S> {
    pub fn new(stream: S) -> Self {
        Checksum {
            stream,
            digest: Sha1::new(),
        }
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S> Checksum<S>
where
    S: DerefMut,
    S::Target: Read,
{
    pub fn read(&mut self, size: usize) -> anyhow::Result<Bytes> {
        let mut buffer = vec![0; size];
        self.stream
            .deref_mut()
            .read_exact(&mut buffer)
            .map_err(|_| anyhow!("Unexpected end-of-file while reading state"))?;

        self.digest.update(&buffer);
        Ok(Bytes::from(buffer))
    }

    pub fn read_u16(&mut self) -> anyhow::Result<u16> {
        let bytes = self.read(2)?;
        Ok(byteorder::NetworkEndian::read_u16(&bytes))
    }

    pub fn read_string(&mut self) -> anyhow::Result<String> {
        let length = self.read_u16()? as usize;
        let bytes = self.read(length)?;

        String::from_utf8(bytes.to_vec()).context("State entry is not valid UTF-8")
    }

    pub fn read_oid(&mut self) -> anyhow::Result<ObjectId> {
        let bytes = self.read(OBJECT_ID_BYTES)?;
        ObjectId::read_bytes_from(&mut &bytes[..])
    }

    /// Compare the trailing checksum with the digest of everything read so far
    pub fn verify(&mut self) -> anyhow::Result<()> {
        let mut expected_checksum = [0u8; CHECKSUM_SIZE];
        self.stream
            .deref_mut()
            .read_exact(&mut expected_checksum)
            .context("State file is missing its checksum")?;

        let actual_checksum = self.digest.clone().finalize();

        if expected_checksum != actual_checksum.as_slice() {
            anyhow::bail!("Checksum does not match value stored on disk");
        }

        Ok(())
    }
}

impl<S> Checksum<S>
where
    S: DerefMut,
    S::Target: Write,
{
    pub fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.stream.deref_mut().write_all(data)?;
        self.digest.update(data);
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> anyhow::Result<()> {
        let length = u16::try_from(value.len())
            .with_context(|| format!("State entry is too long: {value}"))?;

        let mut prefix = [0u8; 2];
        byteorder::NetworkEndian::write_u16(&mut prefix, length);
        self.write(&prefix)?;
        self.write(value.as_bytes())
    }

    pub fn write_oid(&mut self, oid: &ObjectId) -> anyhow::Result<()> {
        let mut raw = Vec::with_capacity(OBJECT_ID_BYTES);
        oid.write_bytes_to(&mut raw)?;
        self.write(&raw)
    }

    pub fn write_checksum(&mut self) -> anyhow::Result<()> {
        let checksum = self.digest.clone().finalize();
        self.stream
            .deref_mut()
            .write_all(checksum.as_slice())
            .map_err(|_| anyhow!("Failed to write checksum to state file"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn written(build: impl FnOnce(&mut Checksum<Box<Cursor<Vec<u8>>>>)) -> Vec<u8> {
        let mut writer = Checksum::new(Box::new(Cursor::new(Vec::new())));
        build(&mut writer);
        writer.write_checksum().unwrap();
        writer.into_inner().into_inner()
    }

    #[test]
    fn verifies_what_it_wrote() {
        let bytes = written(|writer| writer.write_string("main").unwrap());

        let mut reader = Checksum::new(Box::new(Cursor::new(bytes)));
        assert_eq!(reader.read_string().unwrap(), "main");
        assert!(reader.verify().is_ok());
    }

    #[test]
    fn detects_corruption() {
        let mut bytes = written(|writer| writer.write_string("main").unwrap());
        bytes[3] ^= 0xff;

        let mut reader = Checksum::new(Box::new(Cursor::new(bytes)));
        reader.read_string().unwrap();
        assert!(reader.verify().is_err());
    }

    #[test]
    fn truncated_input_is_an_error() {
        let mut reader = Checksum::new(Box::new(Cursor::new(vec![0u8, 9, b'a'])));

        assert!(reader.read_string().is_err());
    }
}
