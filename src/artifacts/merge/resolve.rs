//! Per-path three-way resolution
//!
//! | current vs split | other vs split | result                    |
//! |------------------|----------------|---------------------------|
//! | unchanged        | unchanged      | current                   |
//! | unchanged        | changed        | other (possibly deleted)  |
//! | changed          | unchanged      | current                   |
//! | changed          | changed, same  | either                    |
//! | changed          | changed, other | conflict                  |

use crate::artifacts::diff::tree_diff::TreeDiff;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntries;
use std::collections::{BTreeMap, BTreeSet};

/// The two sides of a conflicted path; `None` means deleted on that side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictSides {
    pub current: Option<ObjectId>,
    pub other: Option<ObjectId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Snapshot of every cleanly merged path
    pub merged: TreeEntries,
    pub conflicts: BTreeMap<String, ConflictSides>,
}

impl Resolution {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

pub fn resolve(split: &TreeEntries, current: &TreeEntries, other: &TreeEntries) -> Resolution {
    let current_changes = TreeDiff::between(split, current);
    let other_changes = TreeDiff::between(split, other);

    let paths = split
        .keys()
        .chain(current.keys())
        .chain(other.keys())
        .collect::<BTreeSet<_>>();

    let mut resolution = Resolution::default();

    for path in paths {
        let current_oid = current.get(path);
        let other_oid = other.get(path);

        let taken = match (current_changes.touches(path), other_changes.touches(path)) {
            (false, true) => other_oid,
            (true, true) if current_oid != other_oid => {
                resolution.conflicts.insert(
                    path.clone(),
                    ConflictSides {
                        current: current_oid.cloned(),
                        other: other_oid.cloned(),
                    },
                );
                continue;
            }
            _ => current_oid,
        };

        if let Some(oid) = taken {
            resolution.merged.insert(path.clone(), oid.clone());
        }
    }

    resolution
}
