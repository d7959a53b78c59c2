use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::conflict::conflict_markers;
use crate::artifacts::merge::resolve::resolve;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GitletError;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;

const ANCESTOR_NOTICE: &str = "Given branch is an ancestor of the current branch.";
const FAST_FORWARD_NOTICE: &str = "Current branch fast-forwarded.";
const CONFLICT_NOTICE: &str = "Encountered a merge conflict.";

impl Repository {
    pub async fn merge(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;
        state.rehydrate()?;

        if !state.index().is_empty() {
            return Err(GitletError::UncommittedChanges.into());
        }

        let other_branch = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| GitletError::BranchDoesNotExist)?;
        let other_oid = state
            .refs()
            .read_ref(&other_branch)
            .cloned()
            .ok_or(GitletError::BranchDoesNotExist)?;
        if state.refs().is_current_branch(&other_branch) {
            return Err(GitletError::SelfMerge.into());
        }

        let current_branch = state.refs().current_branch().clone();
        let current_oid = state.refs().read_head()?;

        let split_oid = self
            .commit_graph()
            .lowest_common_ancestor(&other_oid, &current_oid)?
            .with_context(|| format!("no common ancestor between {current_branch} and {other_branch}"))?;

        tracing::debug!(
            current = %current_oid.to_short_oid(),
            other = %other_oid.to_short_oid(),
            split = %split_oid.to_short_oid(),
            "found split point"
        );

        if split_oid == other_oid {
            writeln!(self.writer(), "{ANCESTOR_NOTICE}")?;
            return Ok(());
        }

        if split_oid == current_oid {
            let other_tree = self.database().load_commit_tree(&other_oid)?.into_entries();
            self.migrate_workspace(&state, &other_tree)?;

            state.refs_mut().update_head(other_oid.clone())?;
            state.write_updates()?;

            tracing::info!(branch = %current_branch, to = %other_oid.to_short_oid(), "fast-forwarded");
            writeln!(self.writer(), "{FAST_FORWARD_NOTICE}")?;
            return Ok(());
        }

        let split_tree = self.database().load_commit_tree(&split_oid)?.into_entries();
        let current_tree = self.head_tree(&state)?;
        let other_tree = self.database().load_commit_tree(&other_oid)?.into_entries();

        let resolution = resolve(&split_tree, &current_tree, &other_tree);

        let mut merged = resolution.merged.clone();
        let mut conflict_blobs = Vec::with_capacity(resolution.conflicts.len());
        for (path, sides) in &resolution.conflicts {
            let current = self.read_blob_content(sides.current.as_ref())?;
            let other = self.read_blob_content(sides.other.as_ref())?;

            let blob = Blob::new(conflict_markers(
                current.as_deref(),
                other.as_deref(),
                other_branch.as_ref(),
            ));
            merged.insert(path.clone(), blob.object_id()?);
            conflict_blobs.push(blob);
        }

        let mut migration = Migration::new(self.database());
        migration.plan_changes(self.workspace(), state.index(), &current_tree, &merged)?;
        migration.validate()?;

        for blob in &conflict_blobs {
            self.database().store(blob)?;
        }
        migration.apply_changes(self.workspace())?;

        let message = format!("Merged {other_branch} into {current_branch}.");
        self.write_commit(&mut state, vec![current_oid, other_oid], merged, message)?;
        state.write_updates()?;

        if resolution.has_conflicts() {
            tracing::warn!(
                paths = ?resolution.conflicts.keys().collect::<Vec<_>>(),
                "merge left conflict markers"
            );
            writeln!(self.writer(), "{CONFLICT_NOTICE}")?;
        }

        Ok(())
    }

    fn read_blob_content(&self, blob_oid: Option<&ObjectId>) -> anyhow::Result<Option<Bytes>> {
        blob_oid
            .map(|oid| {
                self.database()
                    .parse_object_as_blob(oid)
                    .map(Blob::into_content)
            })
            .transpose()
    }
}
