//! Persisted repository state
//!
//! The branch table, HEAD and the staging area live together in a single
//! checksummed file, `.gitlet/state`, so a command either observes all of a
//! previous command's updates or none of them. The binary layout is described
//! in `artifacts::state`.
//!
//! ## Locking
//!
//! Reads hold a shared lock on the state file. Writes build the new contents
//! in `state.lock` under an exclusive lock, flush them to disk and rename the
//! lock file over the state file.

use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::state::checksum::Checksum;
use crate::artifacts::state::state_header::StateHeader;
use crate::artifacts::state::HEADER_SIZE;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct RepositoryState {
    /// Path to the state file (typically `.gitlet/state`)
    path: Box<Path>,
    refs: Refs,
    index: Index,
    /// Set whenever the in-memory state diverges from disk
    changed: bool,
}

impl RepositoryState {
    pub fn new(path: Box<Path>) -> Self {
        RepositoryState {
            path,
            refs: Refs::default(),
            index: Index::default(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn refs_mut(&mut self) -> &mut Refs {
        self.changed = true;
        &mut self.refs
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut Index {
        self.changed = true;
        &mut self.index
    }

    pub fn has_changes(&self) -> bool {
        self.changed
    }

    /// Replace the in-memory state, e.g. when initializing a repository
    pub fn reset_to(&mut self, refs: Refs, index: Index) {
        self.refs = refs;
        self.index = index;
        self.changed = true;
    }

    /// Load the state from disk, verifying its checksum
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        let mut state_file = std::fs::OpenOptions::new()
            .read(true)
            .open(self.path())
            .with_context(|| format!("Failed to open state file {}", self.path.display()))?;
        let lock = file_guard::lock(&mut state_file, file_guard::Lock::Shared, 0, 1)?;

        let mut reader = Checksum::new(lock);

        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = StateHeader::deserialize(std::io::Cursor::new(header_bytes))?;
        header.validate()?;

        let head = BranchName::try_parse(reader.read_string()?)?;

        let mut branches = BTreeMap::new();
        for _ in 0..header.branches_count {
            let name = BranchName::try_parse(reader.read_string()?)?;
            let oid = reader.read_oid()?;
            branches.insert(name, oid);
        }

        let mut added = BTreeMap::new();
        for _ in 0..header.added_count {
            let path = reader.read_string()?;
            let oid = reader.read_oid()?;
            added.insert(path, oid);
        }

        let mut removed = BTreeSet::new();
        for _ in 0..header.removed_count {
            removed.insert(reader.read_string()?);
        }

        reader.verify()?;

        self.refs = Refs::from_parts(head, branches)?;
        self.index = Index::new(added, removed);
        self.changed = false;

        tracing::debug!(
            head = %self.refs.current_branch(),
            staged = self.index.added().len(),
            removed = self.index.removed().len(),
            "loaded repository state"
        );

        Ok(())
    }

    /// Persist the state if it changed since it was loaded
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let lock_path = self.lock_path();
        let mut lock_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to create {}", lock_path.display()))?;
        let lock = file_guard::lock(&mut lock_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock);

        let branches = self.refs.list_branches().collect::<Vec<_>>();
        let header = StateHeader::with_counts(
            u32::try_from(branches.len())?,
            u32::try_from(self.index.added().len())?,
            u32::try_from(self.index.removed().len())?,
        );
        writer.write(&header.serialize()?)?;
        writer.write_string(self.refs.current_branch().as_ref())?;

        for (name, oid) in branches {
            writer.write_string(name.as_ref())?;
            writer.write_oid(oid)?;
        }
        for (path, oid) in self.index.added() {
            writer.write_string(path)?;
            writer.write_oid(oid)?;
        }
        for path in self.index.removed() {
            writer.write_string(path)?;
        }

        writer.write_checksum()?;

        let lock = writer.into_inner();
        lock.sync_all()?;
        drop(lock);

        std::fs::rename(&lock_path, self.path())
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        self.changed = false;

        tracing::debug!(head = %self.refs.current_branch(), "wrote repository state");

        Ok(())
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }
}
