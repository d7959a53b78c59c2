//! Staging area
//!
//! Holds the two staging sets of the next commit:
//! - `added`: paths mapped to the blob id that will be committed
//! - `removed`: paths that will be dropped from the next snapshot
//!
//! A path is never in both sets at once. Both are kept sorted so status
//! output and the on-disk encoding are deterministic.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntries;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    added: BTreeMap<String, ObjectId>,
    removed: BTreeSet<String>,
}

impl Index {
    pub fn new(added: BTreeMap<String, ObjectId>, removed: BTreeSet<String>) -> Self {
        Index { added, removed }
    }

    /// Stage `path` with the given blob, cancelling any pending removal
    pub fn stage_addition(&mut self, path: &str, oid: ObjectId) {
        self.removed.remove(path);
        self.added.insert(path.to_string(), oid);
    }

    /// Stage `path` for removal, dropping any staged addition
    pub fn stage_removal(&mut self, path: &str) {
        self.added.remove(path);
        self.removed.insert(path.to_string());
    }

    /// Forget `path` in both sets; returns whether anything changed
    pub fn unstage(&mut self, path: &str) -> bool {
        let was_added = self.added.remove(path).is_some();
        let was_removed = self.removed.remove(path);

        was_added || was_removed
    }

    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn added(&self) -> &BTreeMap<String, ObjectId> {
        &self.added
    }

    pub fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    pub fn staged_oid(&self, path: &str) -> Option<&ObjectId> {
        self.added.get(path)
    }

    pub fn is_staged(&self, path: &str) -> bool {
        self.added.contains_key(path)
    }

    pub fn is_removed(&self, path: &str) -> bool {
        self.removed.contains(path)
    }

    /// Snapshot produced by committing on top of `base`
    pub fn apply_to(&self, base: &TreeEntries) -> TreeEntries {
        let mut entries = base.clone();

        for (path, oid) in &self.added {
            entries.insert(path.clone(), oid.clone());
        }
        for path in &self.removed {
            entries.remove(path);
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    #[fixture]
    fn index() -> Index {
        let mut index = Index::default();
        index.stage_addition("a.txt", oid('a'));
        index.stage_removal("b.txt");
        index
    }

    #[rstest]
    fn a_path_lives_in_one_set_at_a_time(mut index: Index) {
        index.stage_removal("a.txt");
        index.stage_addition("b.txt", oid('b'));

        assert_eq!(index.added().keys().collect::<Vec<_>>(), vec!["b.txt"]);
        assert_eq!(index.removed().iter().collect::<Vec<_>>(), vec!["a.txt"]);
    }

    #[rstest]
    fn unstage_reports_whether_the_path_was_staged(mut index: Index) {
        assert!(index.unstage("a.txt"));
        assert!(index.unstage("b.txt"));
        assert!(!index.unstage("c.txt"));
        assert!(index.is_empty());
    }

    #[rstest]
    fn restaging_replaces_the_blob(mut index: Index) {
        index.stage_addition("a.txt", oid('c'));

        assert_eq!(index.staged_oid("a.txt"), Some(&oid('c')));
        assert_eq!(index.added().len(), 1);
    }

    #[rstest]
    fn applying_to_a_snapshot_adds_and_drops_paths(index: Index) {
        let base = TreeEntries::from([
            ("a.txt".to_string(), oid('0')),
            ("b.txt".to_string(), oid('b')),
            ("c.txt".to_string(), oid('c')),
        ]);

        let next = index.apply_to(&base);

        assert_eq!(
            next,
            TreeEntries::from([
                ("a.txt".to_string(), oid('a')),
                ("c.txt".to_string(), oid('c')),
            ])
        );
    }
}
