use crate::areas::repository::Repository;
use crate::areas::state::RepositoryState;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::CommitRevision;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::tree::TreeEntries;
use crate::errors::GitletError;

impl Repository {
    /// Restore one file from `revision`, or from the head commit
    ///
    /// The staging area is left alone.
    pub async fn checkout_file(&mut self, revision: Option<&str>, path: &str) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;
        state.rehydrate()?;

        let commit_oid = match revision {
            Some(revision) => CommitRevision::parse(revision).resolve(self.database())?,
            None => state.refs().read_head()?,
        };
        let tree = self.database().load_commit_tree(&commit_oid)?;

        let path = self
            .workspace()
            .normalize(path)
            .ok_or(GitletError::FileNotInCommit)?;
        let blob_oid = tree.get(&path).ok_or(GitletError::FileNotInCommit)?;

        let blob = self.database().parse_object_as_blob(blob_oid)?;
        self.workspace().write_file(&path, blob.content())?;

        tracing::debug!(path = %path, commit = %commit_oid.to_short_oid(), "restored file");

        Ok(())
    }

    /// Switch to another branch, replacing the working tree with its snapshot
    pub async fn checkout_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;
        state.rehydrate()?;

        let branch_name =
            BranchName::try_parse(branch_name.to_string()).map_err(|_| GitletError::NoSuchBranch)?;
        let target_oid = state
            .refs()
            .read_ref(&branch_name)
            .cloned()
            .ok_or(GitletError::NoSuchBranch)?;
        if state.refs().is_current_branch(&branch_name) {
            return Err(GitletError::AlreadyOnBranch.into());
        }

        let target_tree = self.database().load_commit_tree(&target_oid)?.into_entries();
        self.migrate_workspace(&state, &target_tree)?;

        state.refs_mut().set_head(branch_name.clone())?;
        state.index_mut().clear();
        state.write_updates()?;

        tracing::info!(branch = %branch_name, at = %target_oid.to_short_oid(), "switched branch");

        Ok(())
    }

    /// Bring the working tree from the head snapshot to `target`
    ///
    /// Nothing on disk changes when an untracked file is in the way.
    pub(crate) fn migrate_workspace(
        &self,
        state: &RepositoryState,
        target: &TreeEntries,
    ) -> anyhow::Result<()> {
        let head_tree = self.head_tree(state)?;

        let mut migration = Migration::new(self.database());
        migration.plan_changes(self.workspace(), state.index(), &head_tree, target)?;
        migration.apply_changes(self.workspace())
    }
}
