use crate::areas::repository::Repository;
use crate::errors::GitletError;

impl Repository {
    pub async fn rm(&mut self, path: &str) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;

        state.rehydrate()?;

        let path = self
            .workspace()
            .normalize(path)
            .ok_or(GitletError::NoReasonToRemove)?;
        let is_tracked = self.head_tree(&state)?.contains_key(&path);

        if is_tracked {
            state.index_mut().stage_removal(&path);

            if self.workspace().is_file(&path) {
                self.workspace().remove_file(&path)?;
            }
        } else if state.index().is_staged(&path) {
            // staged-only files stay on disk
            state.index_mut().unstage(&path);
        } else {
            return Err(GitletError::NoReasonToRemove.into());
        }

        state.write_updates()?;

        Ok(())
    }
}
