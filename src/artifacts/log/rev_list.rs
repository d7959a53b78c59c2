use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

/// First-parent history, newest first
///
/// Yields `(id, commit)` pairs and stops after the root commit. A commit that
/// fails to load is yielded as an error and ends the walk.
#[derive(Clone)]
pub struct RevList<'r> {
    database: &'r Database,
    current_commit_oid: Option<ObjectId>,
}

impl<'r> RevList<'r> {
    pub fn new(database: &'r Database, start: ObjectId) -> Self {
        RevList {
            database,
            current_commit_oid: Some(start),
        }
    }
}

impl Iterator for RevList<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self.database.parse_object_as_commit(&commit_oid) {
            Ok(commit) => {
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok((commit_oid, commit)))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
