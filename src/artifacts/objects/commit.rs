//! Commit object
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-id>
//! parent <parent-id>          (zero, one or two lines)
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::BufRead;

/// Message of the root commit created by `init`
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

const DEFAULT_AUTHOR_NAME: &str = "gitlet";
const DEFAULT_AUTHOR_EMAIL: &str = "gitlet@localhost";

/// Author or committer identity with a timestamp
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    pub fn new(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Identity used for the root commit: fixed author at the Unix epoch
    pub fn sentinel() -> Self {
        Author::new(
            DEFAULT_AUTHOR_NAME.to_string(),
            DEFAULT_AUTHOR_EMAIL.to_string(),
            DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset(),
        )
    }

    /// Load author information from the environment
    ///
    /// Reads `GITLET_AUTHOR_NAME`, `GITLET_AUTHOR_EMAIL` and `GITLET_AUTHOR_DATE`,
    /// falling back to fixed defaults and the current local time.
    pub fn load_from_env() -> Self {
        let name = std::env::var("GITLET_AUTHOR_NAME")
            .unwrap_or_else(|_| DEFAULT_AUTHOR_NAME.to_string());
        let email = std::env::var("GITLET_AUTHOR_EMAIL")
            .unwrap_or_else(|_| DEFAULT_AUTHOR_EMAIL.to_string());
        let timestamp = std::env::var("GITLET_AUTHOR_DATE")
            .ok()
            .and_then(|date| {
                DateTime::parse_from_rfc2822(&date)
                    .or_else(|_| DateTime::parse_from_str(&date, "%Y-%m-%d %H:%M:%S %z"))
                    .ok()
            })
            .unwrap_or_else(|| chrono::Local::now().fixed_offset());

        Author::new(name, email, timestamp)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format like "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // "name <email> timestamp timezone", split from the right
        let mut parts = value.rsplitn(3, ' ');
        let timezone = parts.next().context("Invalid author: missing timezone")?;
        let seconds = parts
            .next()
            .context("Invalid author: missing timestamp")?
            .parse::<i64>()
            .context("Invalid author: timestamp is not a number")?;
        let identity = parts.next().context("Invalid author: missing identity")?;

        let email_start = identity.find('<').context("Invalid author: missing '<'")?;
        let email_end = identity.rfind('>').context("Invalid author: missing '>'")?;

        let offset = *DateTime::parse_from_str(
            &format!("1970-01-01 00:00:00 {timezone}"),
            "%Y-%m-%d %H:%M:%S %z",
        )
        .context("Invalid author: bad timezone")?
        .offset();
        let timestamp = DateTime::<chrono::Utc>::from_timestamp(seconds, 0)
            .context("Invalid author: timestamp out of range")?
            .with_timezone(&offset);

        Ok(Author {
            name: identity[..email_start].trim().to_string(),
            email: identity[email_start + 1..email_end].to_string(),
            timestamp,
        })
    }
}

/// Commit header used by graph traversals
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Empty for the root commit, two entries for merge commits
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        Commit {
            parents,
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.author.timestamp()
    }

    pub fn to_slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents.clone(),
            timestamp: self.timestamp(),
        }
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        lines.extend(self.parents.iter().map(|parent| format!("parent {parent}")));
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content = format!("{}\n\n{}", self.header_lines().join("\n"), self.message);

        Ok(frame(self.object_type(), content.as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .context("Invalid commit object: not UTF-8")?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut tree_oid = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;

        for line in headers.lines() {
            let (key, value) = line
                .split_once(' ')
                .with_context(|| format!("Invalid commit header line: {line}"))?;

            match key {
                "tree" => tree_oid = Some(ObjectId::try_parse(value.to_string())?),
                "parent" => parents.push(ObjectId::try_parse(value.to_string())?),
                "author" => author = Some(Author::try_from(value)?),
                "committer" => committer = Some(Author::try_from(value)?),
                _ => anyhow::bail!("Unknown commit header: {key}"),
            }
        }

        let author = author.context("Invalid commit object: missing author")?;
        Ok(Commit {
            parents,
            tree_oid: tree_oid.context("Invalid commit object: missing tree")?,
            committer: committer.unwrap_or_else(|| author.clone()),
            author,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
