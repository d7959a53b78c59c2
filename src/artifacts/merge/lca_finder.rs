//! Split point finder for merges
//!
//! The split point of commits `a` and `b` is their lowest common ancestor over
//! the commit DAG:
//!
//! 1. Walk every ancestor of `a` (including `a`), recording the minimal number
//!    of parent edges needed to reach it.
//! 2. Walk the ancestors of `b` breadth-first, one depth level at a time,
//!    following the first parent before the second.
//! 3. The first level that contains ancestors of `a` decides the answer: the
//!    candidate closest to `a` wins, and remaining ties go to the candidate
//!    visited first.
//!
//! ```text
//!       A
//!      / \
//!     B   C
//!     |\ /|
//!     | X |
//!     |/ \|
//!     D   E      D = merge(B, C), E = merge(C, B)
//!
//! Starting the walk from E, B and C sit on the same level at the same
//! distance from D, so E's first parent C is the split point.
//! ```
//!
//! The finder is generic over a commit loader so it runs equally against the
//! object database and in-memory graphs.
//!
//! ## Debug output
//!
//! Building with `--features debug_merge` prints every traversal step to
//! stderr.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{HashMap, VecDeque};
use std::fmt;

macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub struct LcaFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> LcaFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        LcaFinder { commit_loader }
    }

    /// Every ancestor of `source` with its minimal distance in parent edges
    pub fn ancestor_distances(&self, source: &ObjectId) -> anyhow::Result<HashMap<ObjectId, usize>> {
        let mut distances = HashMap::from([(source.clone(), 0)]);
        let mut queue = VecDeque::from([source.clone()]);

        // breadth-first, so the first time a commit is reached is the shortest
        while let Some(commit_id) = queue.pop_front() {
            let distance = distances.get(&commit_id).copied().unwrap_or_default();

            for parent in (self.commit_loader)(&commit_id)?.parents {
                if !distances.contains_key(&parent) {
                    distances.insert(parent.clone(), distance + 1);
                    queue.push_back(parent);
                }
            }
        }

        Ok(distances)
    }

    /// Split point of `source` and `target`, or `None` for unrelated histories
    pub fn find_lowest_common_ancestor(
        &self,
        source: &ObjectId,
        target: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let distances = self.ancestor_distances(source)?;
        let mut states: HashMap<ObjectId, VisitState> = distances
            .keys()
            .map(|commit_id| (commit_id.clone(), VisitState::VISITED_FROM_SOURCE))
            .collect();

        let mut level = vec![target.clone()];
        states
            .entry(target.clone())
            .or_insert(VisitState::NONE)
            .insert(VisitState::VISITED_FROM_TARGET);

        while !level.is_empty() {
            let candidate = level
                .iter()
                .filter(|commit_id| states.get(*commit_id) == Some(&VisitState::VISITED_FROM_BOTH))
                .min_by_key(|commit_id| distances.get(*commit_id).copied().unwrap_or(usize::MAX));

            if let Some(candidate) = candidate {
                debug_log!(
                    "Split point of {} and {}: {}",
                    source.to_short_oid(),
                    target.to_short_oid(),
                    candidate.to_short_oid()
                );
                tracing::debug!(
                    source = %source,
                    target = %target,
                    split_point = %candidate,
                    "found split point"
                );
                return Ok(Some(candidate.clone()));
            }

            let mut next_level = Vec::new();
            for commit_id in &level {
                for parent in (self.commit_loader)(commit_id)?.parents {
                    let state = states.entry(parent.clone()).or_insert(VisitState::NONE);
                    if state.contains(VisitState::VISITED_FROM_TARGET) {
                        continue;
                    }

                    state.insert(VisitState::VISITED_FROM_TARGET);
                    debug_log!("Visiting {}: state={}", parent.to_short_oid(), state);
                    next_level.push(parent);
                }
            }

            level = next_level;
        }

        Ok(None)
    }

    /// Whether `ancestor` is reachable from `descendant`, counting itself
    pub fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> anyhow::Result<bool> {
        let mut visited = HashMap::from([(descendant.clone(), VisitState::VISITED_FROM_TARGET)]);
        let mut queue = VecDeque::from([descendant.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            if &commit_id == ancestor {
                return Ok(true);
            }

            for parent in (self.commit_loader)(&commit_id)?.parents {
                if !visited.contains_key(&parent) {
                    visited.insert(parent.clone(), VisitState::VISITED_FROM_TARGET);
                    queue.push_back(parent);
                }
            }
        }

        Ok(false)
    }
}
