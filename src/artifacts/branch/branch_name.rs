use crate::artifacts::branch::{DEFAULT_BRANCH, INVALID_BRANCH_NAME_REGEX};
use crate::errors::GitletError;
use anyhow::Context;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            return Err(GitletError::InvalidBranchName(name).into());
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            Err(GitletError::InvalidBranchName(name).into())
        } else {
            Ok(Self(name))
        }
    }

    pub fn default_branch() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    proptest! {
        #[test]
        fn accepts_plain_names(branch_name in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn accepts_slash_separated_names(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            assert!(BranchName::try_parse(format!("{prefix}/{suffix}")).is_ok());
        }

        #[test]
        fn rejects_leading_dot(suffix in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(format!(".{suffix}")).is_err());
        }

        #[test]
        fn rejects_lock_suffix(prefix in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(format!("{prefix}.lock")).is_err());
        }

        #[test]
        fn rejects_consecutive_dots(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            assert!(BranchName::try_parse(format!("{prefix}..{suffix}")).is_err());
        }

        #[test]
        fn rejects_whitespace_and_specials(
            prefix in "[a-zA-Z0-9_-]+",
            special in "[ \\t*:?\\[\\\\~^]"
        ) {
            assert!(BranchName::try_parse(format!("{prefix}{special}")).is_err());
        }
    }

    #[test]
    fn rejects_empty_name_with_user_error() {
        let error = BranchName::try_parse(String::new()).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<GitletError>(),
            Some(GitletError::InvalidBranchName(_))
        ));
    }

    #[test]
    fn default_branch_is_main() {
        let main = BranchName::default_branch();

        assert_eq!(main.as_ref(), "main");
    }
}
