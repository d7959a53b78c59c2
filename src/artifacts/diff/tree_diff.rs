use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntries;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeChangeType {
    Added(ObjectId),
    Deleted(ObjectId),
    Modified { old: ObjectId, new: ObjectId },
}

impl TreeChangeType {
    pub fn from_entries(old: Option<&ObjectId>, new: Option<&ObjectId>) -> Option<Self> {
        match (old, new) {
            (None, Some(new)) => Some(TreeChangeType::Added(new.clone())),
            (Some(old), None) => Some(TreeChangeType::Deleted(old.clone())),
            (Some(old), Some(new)) if old != new => Some(TreeChangeType::Modified {
                old: old.clone(),
                new: new.clone(),
            }),
            _ => None,
        }
    }

    pub fn old_entry(&self) -> Option<&ObjectId> {
        match self {
            TreeChangeType::Deleted(oid) => Some(oid),
            TreeChangeType::Modified { old, .. } => Some(old),
            TreeChangeType::Added(_) => None,
        }
    }

    pub fn new_entry(&self) -> Option<&ObjectId> {
        match self {
            TreeChangeType::Added(oid) => Some(oid),
            TreeChangeType::Modified { new, .. } => Some(new),
            TreeChangeType::Deleted(_) => None,
        }
    }
}

pub type ChangeSet = BTreeMap<String, TreeChangeType>;

/// Changes needed to turn the `old` snapshot into the `new` one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDiff {
    change_set: ChangeSet,
}

impl TreeDiff {
    pub fn between(old: &TreeEntries, new: &TreeEntries) -> Self {
        let mut change_set = ChangeSet::new();

        for (path, old_oid) in old {
            if let Some(change) = TreeChangeType::from_entries(Some(old_oid), new.get(path)) {
                change_set.insert(path.clone(), change);
            }
        }
        for (path, new_oid) in new {
            if !old.contains_key(path) {
                change_set.insert(path.clone(), TreeChangeType::Added(new_oid.clone()));
            }
        }

        TreeDiff { change_set }
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.change_set
    }

    pub fn get(&self, path: &str) -> Option<&TreeChangeType> {
        self.change_set.get(path)
    }

    pub fn touches(&self, path: &str) -> bool {
        self.change_set.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.change_set.is_empty()
    }
}
