use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::CommitRevision;

impl Repository {
    /// Move the current branch to `revision` and check out its snapshot
    pub async fn reset(&mut self, revision: &str) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;
        state.rehydrate()?;

        let target_oid = CommitRevision::parse(revision).resolve(self.database())?;
        let target_tree = self.database().load_commit_tree(&target_oid)?.into_entries();

        self.migrate_workspace(&state, &target_tree)?;

        state.refs_mut().update_head(target_oid.clone())?;
        state.index_mut().clear();
        state.write_updates()?;

        tracing::info!(
            branch = %state.refs().current_branch(),
            at = %target_oid.to_short_oid(),
            "reset branch"
        );

        Ok(())
    }
}
