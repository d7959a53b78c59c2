use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::{Author, Commit, INITIAL_COMMIT_MESSAGE};
use crate::artifacts::objects::tree::Tree;
use crate::errors::GitletError;
use anyhow::Context;
use std::fs;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(GitletError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gitlet/objects directory")?;

        let tree_oid = self.database().store(&Tree::default())?;
        let root = Commit::new(
            vec![],
            tree_oid,
            Author::sentinel(),
            INITIAL_COMMIT_MESSAGE.to_string(),
        );
        let root_oid = self.database().store(&root)?;

        let state = self.state();
        let mut state = state.lock().await;

        state.reset_to(
            Refs::new(BranchName::default_branch(), root_oid.clone()),
            Index::default(),
        );
        state.write_updates()?;

        tracing::info!(
            path = %self.path().display(),
            root = %root_oid.to_short_oid(),
            "initialized repository"
        );

        Ok(())
    }
}
