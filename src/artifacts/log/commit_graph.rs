//! Logical view of the commit DAG stored in the object database

use crate::areas::database::{CommitCache, Database};
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::merge::lca_finder::LcaFinder;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

pub struct CommitGraph<'r> {
    database: &'r Database,
    cache: CommitCache<'r>,
}

impl<'r> CommitGraph<'r> {
    pub fn new(database: &'r Database) -> Self {
        CommitGraph {
            database,
            cache: CommitCache::new(database),
        }
    }

    pub fn parents_of(&self, commit_id: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        Ok(self.cache.get_or_load_slim_commit(commit_id)?.parents)
    }

    /// Whether `ancestor` is reachable from `descendant` (including itself)
    pub fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> anyhow::Result<bool> {
        self.lca_finder().is_ancestor(ancestor, descendant)
    }

    pub fn lowest_common_ancestor(
        &self,
        source: &ObjectId,
        target: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        self.lca_finder().find_lowest_common_ancestor(source, target)
    }

    fn lca_finder(&self) -> LcaFinder<impl Fn(&ObjectId) -> anyhow::Result<SlimCommit> + '_> {
        LcaFinder::new(|commit_id: &ObjectId| self.cache.get_or_load_slim_commit(commit_id))
    }

    pub fn history(&self, start: ObjectId) -> RevList<'r> {
        RevList::new(self.database, start)
    }

    /// Every commit reachable from `tips`, each exactly once
    pub fn all_commits<'t>(&self, tips: impl IntoIterator<Item = &'t ObjectId>) -> AllCommits<'r> {
        let queue = tips.into_iter().cloned().collect::<VecDeque<_>>();

        AllCommits {
            database: self.database,
            seen: queue.iter().cloned().collect(),
            queue,
        }
    }
}

/// Breadth-first walk over the union of several histories
pub struct AllCommits<'r> {
    database: &'r Database,
    queue: VecDeque<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl Iterator for AllCommits<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_id = self.queue.pop_front()?;

        match self.database.parse_object_as_commit(&commit_id) {
            Ok(commit) => {
                for parent in commit.parents() {
                    if self.seen.insert(parent.clone()) {
                        self.queue.push_back(parent.clone());
                    }
                }
                Some(Ok((commit_id, commit)))
            }
            Err(error) => {
                self.queue.clear();
                Some(Err(error))
            }
        }
    }
}
