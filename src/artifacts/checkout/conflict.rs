use crate::errors::GitletError;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictType {
    /// An untracked file would be replaced with different content
    UntrackedOverwritten,
    /// An untracked file would be deleted
    UntrackedRemoved,
}

impl ConflictType {
    pub fn describe(&self) -> &'static str {
        match self {
            ConflictType::UntrackedOverwritten => "would be overwritten",
            ConflictType::UntrackedRemoved => "would be removed",
        }
    }
}

/// Untracked files in the way of a checkout, by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictsSet {
    conflicts: BTreeSet<(ConflictType, String)>,
}

impl ConflictsSet {
    pub fn record(&mut self, conflict_type: ConflictType, path: &str) {
        self.conflicts.insert((conflict_type, path.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = (ConflictType, &str)> {
        self.conflicts
            .iter()
            .map(|(conflict_type, path)| (*conflict_type, path.as_str()))
    }

    /// Fail with the user-facing error if any conflict was recorded
    pub fn ensure_empty(&self) -> anyhow::Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        for (conflict_type, path) in self.paths() {
            tracing::warn!(path, "untracked file {}", conflict_type.describe());
        }

        Err(GitletError::UntrackedFileInTheWay.into())
    }
}
