use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::GitletError;

impl Repository {
    /// Create a branch pointing at the current head commit
    pub async fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;
        state.rehydrate()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let head_oid = state.refs().read_head()?;

        state
            .refs_mut()
            .create_branch(branch_name.clone(), head_oid.clone())?;
        state.write_updates()?;

        tracing::info!(branch = %branch_name, at = %head_oid.to_short_oid(), "created branch");

        Ok(())
    }

    /// Delete a branch pointer; its commits stay in the store
    pub async fn rm_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;
        state.rehydrate()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| GitletError::BranchDoesNotExist)?;

        let tip = state.refs_mut().delete_branch(&branch_name)?;
        state.write_updates()?;

        tracing::info!(branch = %branch_name, was = %tip.to_short_oid(), "deleted branch");

        Ok(())
    }
}
