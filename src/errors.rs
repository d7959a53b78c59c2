//! User-facing failures
//!
//! Every variant renders the exact message printed to the user. Commands raise
//! these through `anyhow` and the binary downcasts them to decide the exit path.

use thiserror::Error;

/// Broad class of a user-facing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing arguments, unknown command
    Usage,
    /// The repository is not in a state that allows the command
    Precondition,
    /// A commit, branch or file named by the user does not exist
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitletError {
    #[error("Please enter a command.")]
    MissingCommand,
    #[error("No command with that name exists.")]
    UnknownCommand,
    #[error("Incorrect operands.")]
    IncorrectOperands,
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,
    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("File does not exist.")]
    FileDoesNotExist,
    #[error("No reason to remove the file.")]
    NoReasonToRemove,
    #[error("Please enter a commit message.")]
    EmptyCommitMessage,
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("Found no commit with that message.")]
    NoCommitWithMessage,
    #[error("File does not exist in that commit.")]
    FileNotInCommit,
    #[error("No commit with that id exists.")]
    NoCommitWithId,
    #[error("Commit id {0} is ambiguous.")]
    AmbiguousCommitId(String),
    #[error("No such branch exists.")]
    NoSuchBranch,
    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay,
    #[error("A branch with that name already exists.")]
    BranchAlreadyExists,
    #[error("A branch with that name does not exist.")]
    BranchDoesNotExist,
    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch,
    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("Cannot merge a branch with itself.")]
    SelfMerge,
}

impl GitletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GitletError::MissingCommand
            | GitletError::UnknownCommand
            | GitletError::IncorrectOperands
            | GitletError::EmptyCommitMessage
            | GitletError::InvalidBranchName(_) => ErrorKind::Usage,
            GitletError::FileDoesNotExist
            | GitletError::NoCommitWithMessage
            | GitletError::FileNotInCommit
            | GitletError::NoCommitWithId
            | GitletError::AmbiguousCommitId(_)
            | GitletError::NoSuchBranch
            | GitletError::BranchDoesNotExist => ErrorKind::NotFound,
            GitletError::NotInitialized
            | GitletError::AlreadyInitialized
            | GitletError::NoReasonToRemove
            | GitletError::NothingToCommit
            | GitletError::AlreadyOnBranch
            | GitletError::UntrackedFileInTheWay
            | GitletError::BranchAlreadyExists
            | GitletError::CannotRemoveCurrentBranch
            | GitletError::UncommittedChanges
            | GitletError::SelfMerge => ErrorKind::Precondition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(GitletError::UnknownCommand, ErrorKind::Usage)]
    #[case(GitletError::NoCommitWithId, ErrorKind::NotFound)]
    #[case(GitletError::UntrackedFileInTheWay, ErrorKind::Precondition)]
    #[case(GitletError::SelfMerge, ErrorKind::Precondition)]
    fn classifies_errors(#[case] error: GitletError, #[case] kind: ErrorKind) {
        assert_eq!(error.kind(), kind);
    }

    #[test]
    fn renders_exact_user_messages() {
        assert_eq!(
            GitletError::UntrackedFileInTheWay.to_string(),
            "There is an untracked file in the way; delete it, or add and commit it first."
        );
        assert_eq!(
            GitletError::AmbiguousCommitId("abcd".into()).to_string(),
            "Commit id abcd is ambiguous."
        );
    }
}
