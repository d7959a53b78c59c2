use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),
    #[error("object {oid} is a {actual}, expected a {expected}")]
    UnexpectedType {
        oid: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },
}

/// Content-addressed object store under `.gitlet/objects`
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Store an object and return its id; storing existing content is a no-op
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if self.exists(&object_id) {
            tracing::trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("Unable to create object directory {}", object_dir.display())
        })?;

        self.write_object(&object_path, object.serialize()?)?;
        tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    /// Load the framed, decompressed content of an object
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.is_file() {
            return Err(DatabaseError::NotFound(object_id.clone()).into());
        }

        self.read_object(&object_path)
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let reader = self.open_as(object_id, ObjectType::Blob)?;
        Blob::deserialize(reader)
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        let reader = self.open_as(object_id, ObjectType::Tree)?;
        Tree::deserialize(reader)
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let reader = self.open_as(object_id, ObjectType::Commit)?;
        Commit::deserialize(reader)
            .with_context(|| format!("Unable to parse commit {object_id}"))
    }

    /// Load the tree snapshot of the given commit
    pub fn load_commit_tree(&self, commit_id: &ObjectId) -> anyhow::Result<Tree> {
        let commit = self.parse_object_as_commit(commit_id)?;
        self.parse_object_as_tree(commit.tree_oid())
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    fn open_as(&self, object_id: &ObjectId, expected: ObjectType) -> anyhow::Result<impl BufRead> {
        let (actual, reader) = self.parse_object_as_bytes(object_id)?;
        if actual != expected {
            return Err(DatabaseError::UnexpectedType {
                oid: object_id.clone(),
                expected,
                actual,
            }
            .into());
        }

        Ok(reader)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let mut object_reader = Cursor::new(self.load(object_id)?);
        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: &Path) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(object_path)
            .with_context(|| format!("Unable to read object file {}", object_path.display()))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: &Path, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!("Unable to open object file {}", temp_object_path.display())
            })?;

        file.write_all(&object_content).with_context(|| {
            format!("Unable to write object file {}", temp_object_path.display())
        })?;

        // the rename makes the object appear atomically
        std::fs::rename(&temp_object_path, object_path)
            .with_context(|| format!("Unable to rename object file to {}", object_path.display()))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(Bytes::from)
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Find all objects whose id starts with `prefix`
    ///
    /// Only the fan-out directory named by the first two characters is scanned,
    /// so prefixes must be at least four hex characters long.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        if !ObjectId::is_valid_prefix(prefix) {
            return Ok(Vec::new());
        }

        let prefix = prefix.to_ascii_lowercase();
        let (dir_name, file_prefix) = prefix.split_at(2);

        let mut matches = self
            .fan_out_entries(&self.path.join(dir_name))?
            .into_iter()
            .filter(|file_name| file_name.starts_with(file_prefix))
            .filter_map(|file_name| ObjectId::try_parse(format!("{dir_name}{file_name}")).ok())
            .collect::<Vec<_>>();
        matches.sort();

        Ok(matches)
    }

    /// Every commit object held by the store, reachable or not
    pub fn commit_ids(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut commits = Vec::new();

        for dir_name in (0..=u8::MAX).map(|byte| format!("{byte:02x}")) {
            for file_name in self.fan_out_entries(&self.path.join(&dir_name))? {
                let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}")) else {
                    continue;
                };

                if self.get_object_type(&oid)? == ObjectType::Commit {
                    commits.push(oid);
                }
            }
        }

        Ok(commits)
    }

    fn fan_out_entries(&self, dir_path: &Path) -> anyhow::Result<Vec<String>> {
        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir_path)? {
            let file_name = entry?.file_name().to_string_lossy().to_string();
            if !file_name.starts_with("tmp-obj-") {
                entries.push(file_name);
            }
        }

        Ok(entries)
    }
}

/// Memoizing loader of commit headers for graph traversals
pub struct CommitCache<'d> {
    database: &'d Database,
    commits: RefCell<HashMap<ObjectId, SlimCommit>>,
}

impl<'d> CommitCache<'d> {
    pub fn new(database: &'d Database) -> Self {
        CommitCache {
            database,
            commits: RefCell::new(HashMap::new()),
        }
    }

    pub fn get_or_load_slim_commit(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        if let Some(commit) = self.commits.borrow().get(oid) {
            return Ok(commit.clone());
        }

        let slim = self.database.parse_object_as_commit(oid)?.to_slim(oid.clone());
        self.commits.borrow_mut().insert(oid.clone(), slim.clone());

        Ok(slim)
    }
}
