//! Status report
//!
//! ```text
//! === Branches ===
//! *main
//! other
//!
//! === Staged Files ===
//! wug.txt
//!
//! === Removed Files ===
//! goodbye.txt
//!
//! === Modifications Not Staged For Commit ===
//! junk.txt (deleted)
//!
//! === Untracked Files ===
//! random.stuff
//!
//! ```

use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::tree::TreeEntries;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

pub type ChangeSet = BTreeMap<String, WorkspaceChangeType>;
pub type FileSet = BTreeSet<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    /// Branch names with a flag set on the current one
    pub(crate) branches: Vec<(String, bool)>,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

impl StatusInfo {
    pub fn collect(
        refs: &Refs,
        index: &Index,
        head_tree: &TreeEntries,
        workspace: &Workspace,
    ) -> anyhow::Result<Self> {
        let inspector = Inspector::new(workspace);

        let branches = refs
            .list_branches()
            .map(|(name, _)| (name.to_string(), refs.is_current_branch(name)))
            .collect();

        let mut workspace_changeset = ChangeSet::new();

        for (path, oid) in head_tree {
            if index.is_staged(path) {
                continue;
            }

            if index.is_removed(path) {
                // removed, then recreated on disk
                if workspace.is_file(path) {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Modified);
                }
                continue;
            }

            let change = inspector.check_against_workspace(path, Some(oid))?;
            if change != WorkspaceChangeType::None {
                workspace_changeset.insert(path.clone(), change);
            }
        }

        for (path, oid) in index.added() {
            let change = inspector.check_against_workspace(path, Some(oid))?;
            if change != WorkspaceChangeType::None {
                workspace_changeset.insert(path.clone(), change);
            }
        }

        let untracked_files = workspace
            .list_files()?
            .into_iter()
            .filter(|path| !head_tree.contains_key(path) && !index.is_staged(path))
            .collect();

        Ok(StatusInfo {
            branches,
            staged_files: index.added().keys().cloned().collect(),
            removed_files: index.removed().clone(),
            workspace_changeset,
            untracked_files,
        })
    }

    pub fn staged_files(&self) -> &FileSet {
        &self.staged_files
    }

    pub fn removed_files(&self) -> &FileSet {
        &self.removed_files
    }

    pub fn workspace_changeset(&self) -> &ChangeSet {
        &self.workspace_changeset
    }

    pub fn untracked_files(&self) -> &FileSet {
        &self.untracked_files
    }

    /// Render the five sections; colour only touches section entries
    pub fn render(&self, use_color: bool) -> anyhow::Result<String> {
        let mut output = String::new();

        writeln!(output, "=== Branches ===")?;
        for (name, is_current) in &self.branches {
            if *is_current {
                writeln!(output, "*{}", paint(name, use_color, |s| s.green()))?;
            } else {
                writeln!(output, "{name}")?;
            }
        }
        writeln!(output)?;

        writeln!(output, "=== Staged Files ===")?;
        for path in &self.staged_files {
            writeln!(output, "{}", paint(path, use_color, |s| s.green()))?;
        }
        writeln!(output)?;

        writeln!(output, "=== Removed Files ===")?;
        for path in &self.removed_files {
            writeln!(output, "{}", paint(path, use_color, |s| s.green()))?;
        }
        writeln!(output)?;

        writeln!(output, "=== Modifications Not Staged For Commit ===")?;
        for (path, change) in &self.workspace_changeset {
            let entry = format!("{path} {change}");
            writeln!(output, "{}", paint(&entry, use_color, |s| s.red()))?;
        }
        writeln!(output)?;

        writeln!(output, "=== Untracked Files ===")?;
        for path in &self.untracked_files {
            writeln!(output, "{}", paint(path, use_color, |s| s.red()))?;
        }
        writeln!(output)?;

        Ok(output)
    }
}

fn paint(text: &str, use_color: bool, color: impl Fn(&str) -> colored::ColoredString) -> String {
    if use_color {
        color(text).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::branch::branch_name::BranchName;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::object::Object;
    use crate::artifacts::objects::object_id::ObjectId;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;

    fn blob_oid(content: &str) -> ObjectId {
        Blob::new(Bytes::from(content.to_string()))
            .object_id()
            .unwrap()
    }

    #[test]
    fn classifies_every_kind_of_change() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());
        dir.child("clean.txt").write_str("clean").unwrap();
        dir.child("edited.txt").write_str("edited!").unwrap();
        dir.child("recreated.txt").write_str("back").unwrap();
        dir.child("staged.txt").write_str("staged, then edited").unwrap();
        dir.child("new.txt").write_str("new").unwrap();

        let head_tree = TreeEntries::from([
            ("clean.txt".to_string(), blob_oid("clean")),
            ("edited.txt".to_string(), blob_oid("edited")),
            ("missing.txt".to_string(), blob_oid("missing")),
            ("recreated.txt".to_string(), blob_oid("recreated")),
        ]);
        let mut index = Index::default();
        index.stage_removal("recreated.txt");
        index.stage_addition("staged.txt", blob_oid("staged"));
        let mut refs = Refs::new(BranchName::default_branch(), blob_oid("x"));
        refs.create_branch(BranchName::try_parse("other".into()).unwrap(), blob_oid("x"))
            .unwrap();

        let status = StatusInfo::collect(&refs, &index, &head_tree, &workspace).unwrap();

        assert_eq!(
            status.render(false).unwrap(),
            "=== Branches ===\n*main\nother\n\n\
             === Staged Files ===\nstaged.txt\n\n\
             === Removed Files ===\nrecreated.txt\n\n\
             === Modifications Not Staged For Commit ===\n\
             edited.txt (modified)\nmissing.txt (deleted)\n\
             recreated.txt (modified)\nstaged.txt (modified)\n\n\
             === Untracked Files ===\nnew.txt\n\n"
        );
    }
}
