//! Branch table
//!
//! Maps branch names to commit ids and remembers which branch HEAD names.
//! HEAD always names an existing branch; there is no detached state.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GitletError;
use anyhow::Context;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refs {
    head: BranchName,
    branches: BTreeMap<BranchName, ObjectId>,
}

impl Default for Refs {
    fn default() -> Self {
        Refs {
            head: BranchName::default_branch(),
            branches: BTreeMap::new(),
        }
    }
}

impl Refs {
    /// Table with a single branch checked out at `oid`
    pub fn new(head: BranchName, oid: ObjectId) -> Self {
        Refs {
            branches: BTreeMap::from([(head.clone(), oid)]),
            head,
        }
    }

    pub fn from_parts(
        head: BranchName,
        branches: BTreeMap<BranchName, ObjectId>,
    ) -> anyhow::Result<Self> {
        if !branches.contains_key(&head) {
            anyhow::bail!("HEAD names a missing branch: {head}");
        }

        Ok(Refs { head, branches })
    }

    pub fn current_branch(&self) -> &BranchName {
        &self.head
    }

    pub fn is_current_branch(&self, name: &BranchName) -> bool {
        &self.head == name
    }

    /// Commit id of the current branch
    pub fn read_head(&self) -> anyhow::Result<ObjectId> {
        self.branches
            .get(&self.head)
            .cloned()
            .with_context(|| format!("HEAD names a missing branch: {}", self.head))
    }

    pub fn read_ref(&self, name: &BranchName) -> Option<&ObjectId> {
        self.branches.get(name)
    }

    pub fn contains(&self, name: &BranchName) -> bool {
        self.branches.contains_key(name)
    }

    pub fn create_branch(&mut self, name: BranchName, oid: ObjectId) -> anyhow::Result<()> {
        if self.branches.contains_key(&name) {
            return Err(GitletError::BranchAlreadyExists.into());
        }

        self.branches.insert(name, oid);
        Ok(())
    }

    /// Remove a branch pointer; commits stay in the store
    pub fn delete_branch(&mut self, name: &BranchName) -> anyhow::Result<ObjectId> {
        if !self.branches.contains_key(name) {
            return Err(GitletError::BranchDoesNotExist.into());
        }
        if self.is_current_branch(name) {
            return Err(GitletError::CannotRemoveCurrentBranch.into());
        }

        self.branches
            .remove(name)
            .ok_or_else(|| GitletError::BranchDoesNotExist.into())
    }

    /// Point an existing branch at `oid`
    pub fn advance_branch(&mut self, name: &BranchName, oid: ObjectId) -> anyhow::Result<()> {
        let tip = self
            .branches
            .get_mut(name)
            .ok_or(GitletError::NoSuchBranch)?;
        *tip = oid;

        Ok(())
    }

    pub fn update_head(&mut self, oid: ObjectId) -> anyhow::Result<()> {
        let head = self.head.clone();
        self.advance_branch(&head, oid)
    }

    pub fn set_head(&mut self, name: BranchName) -> anyhow::Result<()> {
        if !self.branches.contains_key(&name) {
            return Err(GitletError::NoSuchBranch.into());
        }

        self.head = name;
        Ok(())
    }

    pub fn list_branches(&self) -> impl Iterator<Item = (&BranchName, &ObjectId)> {
        self.branches.iter()
    }

    pub fn tips(&self) -> impl Iterator<Item = &ObjectId> {
        self.branches.values()
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

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    fn gitlet_error(error: anyhow::Error) -> GitletError {
        error.downcast::<GitletError>().unwrap()
    }

    #[fixture]
    fn refs() -> Refs {
        let mut refs = Refs::new(BranchName::default_branch(), oid('1'));
        refs.create_branch(branch("other"), oid('1')).unwrap();
        refs
    }

    #[rstest]
    fn branches_are_listed_in_name_order(mut refs: Refs) {
        refs.create_branch(branch("alpha"), oid('2')).unwrap();

        let names = refs
            .list_branches()
            .map(|(name, _)| name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["alpha", "main", "other"]);
    }

    #[rstest]
    fn duplicate_branch_is_rejected(mut refs: Refs) {
        let error = refs.create_branch(branch("other"), oid('2')).unwrap_err();

        assert!(matches!(gitlet_error(error), GitletError::BranchAlreadyExists));
    }

    #[rstest]
    fn current_branch_cannot_be_deleted(mut refs: Refs) {
        let error = refs.delete_branch(&branch("main")).unwrap_err();
        assert!(matches!(
            gitlet_error(error),
            GitletError::CannotRemoveCurrentBranch
        ));

        let error = refs.delete_branch(&branch("ghost")).unwrap_err();
        assert!(matches!(gitlet_error(error), GitletError::BranchDoesNotExist));

        assert_eq!(refs.delete_branch(&branch("other")).unwrap(), oid('1'));
    }

    #[rstest]
    fn update_head_moves_only_the_current_branch(mut refs: Refs) {
        refs.update_head(oid('2')).unwrap();

        assert_eq!(refs.read_head().unwrap(), oid('2'));
        assert_eq!(refs.read_ref(&branch("other")), Some(&oid('1')));
    }

    #[rstest]
    fn head_can_only_name_existing_branches(mut refs: Refs) {
        assert!(refs.set_head(branch("ghost")).is_err());

        refs.set_head(branch("other")).unwrap();
        assert_eq!(refs.current_branch(), &branch("other"));
    }
}
