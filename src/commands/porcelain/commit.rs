use crate::areas::repository::Repository;
use crate::areas::state::RepositoryState;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntries};
use crate::errors::GitletError;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;

        // Load the refs and staging area from the disk
        state.rehydrate()?;

        if message.trim().is_empty() {
            return Err(GitletError::EmptyCommitMessage.into());
        }
        if state.index().is_empty() {
            return Err(GitletError::NothingToCommit.into());
        }

        let parent = state.refs().read_head()?;
        let entries = state.index().apply_to(&self.head_tree(&state)?);

        self.write_commit(&mut state, vec![parent], entries, message.to_string())?;
        state.write_updates()?;

        Ok(())
    }

    /// Store a snapshot as a new commit on the current branch
    ///
    /// The staging area is cleared; persisting the state is left to the caller.
    pub(crate) fn write_commit(
        &self,
        state: &mut RepositoryState,
        parents: Vec<ObjectId>,
        entries: TreeEntries,
        message: String,
    ) -> anyhow::Result<ObjectId> {
        let tree_oid = self.database().store(&Tree::new(entries))?;

        let author = Author::load_from_env();
        let commit = Commit::new(parents, tree_oid, author, message);
        let commit_oid = self.database().store(&commit)?;

        state.refs_mut().update_head(commit_oid.clone())?;
        state.index_mut().clear();

        tracing::info!(
            branch = %state.refs().current_branch(),
            commit = %commit_oid.to_short_oid(),
            merge = commit.is_merge(),
            "recorded commit"
        );

        Ok(commit_oid)
    }
}
