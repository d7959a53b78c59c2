use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::errors::GitletError;

impl Repository {
    pub async fn add(&mut self, path: &str) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;

        // Load the refs and staging area from the disk
        state.rehydrate()?;

        let path = self
            .workspace()
            .normalize(path)
            .filter(|path| self.workspace().is_file(path))
            .ok_or(GitletError::FileDoesNotExist)?;

        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;
        let head_tree = self.head_tree(&state)?;

        if head_tree.get(&path) == Some(&blob_id) {
            // identical to the committed version: nothing to stage
            if state.index().is_staged(&path) || state.index().is_removed(&path) {
                state.index_mut().unstage(&path);
            }
        } else if state.index().staged_oid(&path) != Some(&blob_id) {
            self.database().store(&blob)?;
            state.index_mut().stage_addition(&path, blob_id);
        }

        state.write_updates()?;

        Ok(())
    }
}
