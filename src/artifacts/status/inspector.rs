use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;

#[derive(new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
}

impl<'r> Inspector<'r> {
    /// Blob id of the file currently on disk, if there is one
    pub fn workspace_oid(&self, path: &str) -> anyhow::Result<Option<ObjectId>> {
        if !self.workspace.is_file(path) {
            return Ok(None);
        }

        let blob = self.workspace.parse_blob(path)?;
        Ok(Some(blob.object_id()?))
    }

    /// Compare the on-disk file with the blob it is expected to hold
    ///
    /// `expected` is `None` for paths the repository does not know about.
    pub fn check_against_workspace(
        &self,
        path: &str,
        expected: Option<&ObjectId>,
    ) -> anyhow::Result<WorkspaceChangeType> {
        match (expected, self.workspace_oid(path)?) {
            (None, None) => Ok(WorkspaceChangeType::None),
            (None, Some(_)) => Ok(WorkspaceChangeType::Untracked),
            (Some(_), None) => Ok(WorkspaceChangeType::Deleted),
            (Some(expected), Some(actual)) if expected != &actual => {
                Ok(WorkspaceChangeType::Modified)
            }
            _ => Ok(WorkspaceChangeType::None),
        }
    }
}
