//! Checkout planning and execution
//!
//! Planning compares HEAD's snapshot with the target snapshot and the live
//! working tree:
//!
//! - every target file whose on-disk bytes differ is scheduled for writing
//! - every file tracked by HEAD but missing from the target is scheduled for
//!   deletion
//! - an untracked file that would be written over with different bytes, or
//!   deleted, is a conflict
//!
//! A file counts as untracked when it is on disk but absent from HEAD, or
//! when it was staged for removal and has been recreated since.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::conflict::{ConflictType, ConflictsSet};
use crate::artifacts::diff::tree_diff::{TreeChangeType, TreeDiff};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntries;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

pub struct Migration<'r> {
    database: &'r Database,
    /// Files to (re)write with the given blob
    writes: BTreeMap<String, ObjectId>,
    /// Tracked files to delete
    deletions: BTreeSet<String>,
    conflicts: ConflictsSet,
}

impl<'r> Migration<'r> {
    pub fn new(database: &'r Database) -> Self {
        Migration {
            database,
            writes: BTreeMap::new(),
            deletions: BTreeSet::new(),
            conflicts: ConflictsSet::default(),
        }
    }

    pub fn writes(&self) -> &BTreeMap<String, ObjectId> {
        &self.writes
    }

    pub fn deletions(&self) -> &BTreeSet<String> {
        &self.deletions
    }

    pub fn conflicts(&self) -> &ConflictsSet {
        &self.conflicts
    }

    pub fn plan_changes(
        &mut self,
        workspace: &Workspace,
        index: &Index,
        head: &TreeEntries,
        target: &TreeEntries,
    ) -> anyhow::Result<()> {
        let is_tracked = |path: &str| head.contains_key(path) && !index.is_removed(path);

        for (path, change) in TreeDiff::between(head, target).changes() {
            if let TreeChangeType::Deleted(_) = change
                && workspace.is_file(path)
            {
                if is_tracked(path) {
                    self.deletions.insert(path.clone());
                } else {
                    self.conflicts.record(ConflictType::UntrackedRemoved, path);
                }
            }
        }

        for (path, oid) in target {
            if workspace.is_dir(path) {
                if self.directory_in_the_way(workspace, path, &is_tracked)? {
                    self.conflicts
                        .record(ConflictType::UntrackedOverwritten, path);
                } else {
                    self.writes.insert(path.clone(), oid.clone());
                }
                continue;
            }

            if let Some(blocker) = self.blocking_parent(workspace, path, &is_tracked) {
                self.conflicts
                    .record(ConflictType::UntrackedOverwritten, &blocker);
                continue;
            }

            if !workspace.is_file(path) {
                self.writes.insert(path.clone(), oid.clone());
                continue;
            }

            let on_disk = workspace.parse_blob(path)?.object_id()?;
            if &on_disk == oid {
                continue;
            }

            if is_tracked(path) {
                self.writes.insert(path.clone(), oid.clone());
            } else {
                self.conflicts
                    .record(ConflictType::UntrackedOverwritten, path);
            }
        }

        tracing::debug!(
            writes = self.writes.len(),
            deletions = self.deletions.len(),
            conflicted = !self.conflicts.is_empty(),
            "planned working tree migration"
        );

        Ok(())
    }

    /// A file standing where one of `path`'s parent directories must go
    ///
    /// Tracked files already scheduled for deletion are not in the way.
    fn blocking_parent(
        &self,
        workspace: &Workspace,
        path: &str,
        is_tracked: &impl Fn(&str) -> bool,
    ) -> Option<String> {
        path.match_indices('/')
            .map(|(position, _)| &path[..position])
            .find(|parent| {
                workspace.is_file(parent)
                    && !(is_tracked(parent) && self.deletions.contains(*parent))
            })
            .map(str::to_string)
    }

    /// Whether the directory at `path` holds a file that the plan would lose
    ///
    /// Tracked files already scheduled for deletion are not in the way.
    fn directory_in_the_way(
        &self,
        workspace: &Workspace,
        path: &str,
        is_tracked: &impl Fn(&str) -> bool,
    ) -> anyhow::Result<bool> {
        let prefix = format!("{path}/");

        Ok(workspace
            .list_files()?
            .iter()
            .filter(|file| file.starts_with(&prefix))
            .any(|file| !(is_tracked(file) && self.deletions.contains(file))))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.conflicts.ensure_empty()
    }

    pub fn apply_changes(&self, workspace: &Workspace) -> anyhow::Result<()> {
        self.validate()?;
        workspace.apply_migration(self)
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        Ok(self
            .database
            .parse_object_as_blob(object_id)?
            .into_content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use crate::errors::GitletError;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct Sandbox {
        dir: TempDir,
        database: Database,
        workspace: Workspace,
    }

    impl Sandbox {
        fn store(&self, content: &str) -> ObjectId {
            self.database
                .store(&Blob::new(Bytes::from(content.to_string())))
                .unwrap()
        }

        fn snapshot(&self, files: &[(&str, &str)]) -> TreeEntries {
            files
                .iter()
                .map(|(path, content)| (path.to_string(), self.store(content)))
                .collect()
        }

        fn plan(&self, index: &Index, head: &TreeEntries, target: &TreeEntries) -> Migration<'_> {
            let mut migration = Migration::new(&self.database);
            migration
                .plan_changes(&self.workspace, index, head, target)
                .unwrap();
            migration
        }
    }

    #[fixture]
    fn sandbox() -> Sandbox {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join(".gitlet/objects").into_boxed_path());
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        Sandbox {
            dir,
            database,
            workspace,
        }
    }

    #[rstest]
    fn tracked_files_are_rewritten_and_deleted(sandbox: Sandbox) {
        sandbox.dir.child("a.txt").write_str("old").unwrap();
        sandbox.dir.child("gone.txt").write_str("bye").unwrap();
        let head = sandbox.snapshot(&[("a.txt", "old"), ("gone.txt", "bye")]);
        let target = sandbox.snapshot(&[("a.txt", "new"), ("dir/b.txt", "b")]);

        let migration = sandbox.plan(&Index::default(), &head, &target);
        migration.apply_changes(&sandbox.workspace).unwrap();

        sandbox.dir.child("a.txt").assert("new");
        sandbox.dir.child("dir/b.txt").assert("b");
        assert!(!sandbox.dir.child("gone.txt").exists());
    }

    #[rstest]
    fn untracked_file_with_other_content_is_a_conflict(sandbox: Sandbox) {
        sandbox.dir.child("wug.txt").write_str("mine").unwrap();
        let target = sandbox.snapshot(&[("wug.txt", "theirs")]);

        let migration = sandbox.plan(&Index::default(), &TreeEntries::new(), &target);
        let error = migration.apply_changes(&sandbox.workspace).unwrap_err();

        assert_eq!(
            error.downcast::<GitletError>().unwrap(),
            GitletError::UntrackedFileInTheWay
        );
        sandbox.dir.child("wug.txt").assert("mine");
    }

    #[rstest]
    fn untracked_file_with_identical_content_is_not_in_the_way(sandbox: Sandbox) {
        sandbox.dir.child("wug.txt").write_str("same").unwrap();
        let target = sandbox.snapshot(&[("wug.txt", "same")]);

        let migration = sandbox.plan(&Index::default(), &TreeEntries::new(), &target);

        assert!(migration.validate().is_ok());
        assert!(migration.writes().is_empty());
    }

    #[rstest]
    fn recreated_removed_file_cannot_be_deleted(sandbox: Sandbox) {
        sandbox.dir.child("f.txt").write_str("recreated").unwrap();
        let head = sandbox.snapshot(&[("f.txt", "original")]);
        let mut index = Index::default();
        index.stage_removal("f.txt");

        let migration = sandbox.plan(&index, &head, &TreeEntries::new());

        assert!(migration.validate().is_err());
        assert_eq!(
            migration.conflicts().paths().collect::<Vec<_>>(),
            vec![(ConflictType::UntrackedRemoved, "f.txt")]
        );
    }

    #[rstest]
    fn untracked_file_where_a_directory_must_go_is_a_conflict(sandbox: Sandbox) {
        sandbox.dir.child("docs").write_str("not a dir").unwrap();
        let target = sandbox.snapshot(&[("docs/readme.txt", "hi")]);

        let migration = sandbox.plan(&Index::default(), &TreeEntries::new(), &target);

        assert_eq!(
            migration.conflicts().paths().collect::<Vec<_>>(),
            vec![(ConflictType::UntrackedOverwritten, "docs")]
        );
    }

    #[rstest]
    fn tracked_directory_can_be_replaced_by_a_file(sandbox: Sandbox) {
        sandbox.dir.child("a/b.txt").write_str("nested").unwrap();
        let head = sandbox.snapshot(&[("a/b.txt", "nested")]);
        let target = sandbox.snapshot(&[("a", "flat")]);

        let migration = sandbox.plan(&Index::default(), &head, &target);
        migration.apply_changes(&sandbox.workspace).unwrap();

        sandbox.dir.child("a").assert("flat");
    }

    #[rstest]
    fn untracked_file_inside_a_replaced_directory_is_a_conflict(sandbox: Sandbox) {
        sandbox.dir.child("a/b.txt").write_str("nested").unwrap();
        sandbox.dir.child("a/mine.txt").write_str("mine").unwrap();
        let head = sandbox.snapshot(&[("a/b.txt", "nested")]);
        let target = sandbox.snapshot(&[("a", "flat")]);

        let migration = sandbox.plan(&Index::default(), &head, &target);

        assert_eq!(
            migration.conflicts().paths().collect::<Vec<_>>(),
            vec![(ConflictType::UntrackedOverwritten, "a")]
        );
        sandbox.dir.child("a/mine.txt").assert("mine");
    }
}
