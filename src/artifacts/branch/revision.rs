use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitletError;

/// A commit named on the command line by its full id or an abbreviation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRevision(String);

impl CommitRevision {
    pub fn parse(revision: &str) -> Self {
        CommitRevision(revision.trim().to_string())
    }

    /// Resolve to the unique commit whose id starts with the revision
    ///
    /// Fails with `NoCommitWithId` when nothing matches and with
    /// `AmbiguousCommitId` when several commits share the prefix.
    pub fn resolve(&self, database: &Database) -> anyhow::Result<ObjectId> {
        if !ObjectId::is_valid_prefix(&self.0) {
            return Err(GitletError::NoCommitWithId.into());
        }

        let mut candidates = Vec::new();
        for oid in database.find_objects_by_prefix(&self.0)? {
            if database.get_object_type(&oid)? == ObjectType::Commit {
                candidates.push(oid);
            }
        }

        match candidates.len() {
            0 => Err(GitletError::NoCommitWithId.into()),
            1 => Ok(candidates.remove(0)),
            _ => {
                tracing::warn!(
                    prefix = %self.0,
                    candidates = ?candidates.iter().map(ObjectId::to_short_oid).collect::<Vec<_>>(),
                    "ambiguous commit id"
                );
                Err(GitletError::AmbiguousCommitId(self.0.clone()).into())
            }
        }
    }
}
