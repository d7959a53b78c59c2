//! Tree object
//!
//! A tree is a flat snapshot of every tracked file: repository-relative paths
//! (with `/` separators) mapped to blob ids. Entries are kept in a `BTreeMap`,
//! so serialization order is lexicographic and hashing is deterministic.
//!
//! On disk: `tree <size>\0` followed by `<path>\0<20-byte id>` per entry.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::BufRead;

pub type TreeEntries = BTreeMap<String, ObjectId>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: TreeEntries,
}

impl Tree {
    pub fn new(entries: TreeEntries) -> Self {
        Tree { entries }
    }

    pub fn entries(&self) -> &TreeEntries {
        &self.entries
    }

    pub fn into_entries(self) -> TreeEntries {
        self.entries
    }

    pub fn get(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut payload = Vec::new();

        for (path, oid) in &self.entries {
            payload.extend_from_slice(path.as_bytes());
            payload.push(0);
            oid.write_bytes_to(&mut payload)?;
        }

        Ok(frame(self.object_type(), &payload))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = TreeEntries::new();

        loop {
            let mut path = Vec::new();
            if reader.read_until(b'\0', &mut path)? == 0 {
                break;
            }

            if path.pop() != Some(0) {
                anyhow::bail!("Invalid tree object: truncated entry path");
            }

            let path = String::from_utf8(path).context("Invalid tree object: path is not UTF-8")?;
            let oid = ObjectId::read_bytes_from(&mut reader)
                .with_context(|| format!("Invalid tree object: missing id for {path}"))?;

            entries.insert(path, oid);
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn entries_survive_serialization_with_nested_paths() {
        let tree = Tree::new(TreeEntries::from([
            ("b.txt".to_string(), oid('b')),
            ("a/c.txt".to_string(), oid('c')),
        ]));

        let bytes = tree.serialize().unwrap();
        let mut reader = Cursor::new(bytes);
        ObjectType::parse_object_type(&mut reader).unwrap();
        let parsed = Tree::deserialize(reader).unwrap();

        assert_eq!(parsed, tree);
    }

    #[test]
    fn insertion_order_does_not_change_the_id() {
        let mut first = TreeEntries::new();
        first.insert("z.txt".to_string(), oid('1'));
        first.insert("a.txt".to_string(), oid('2'));
        let mut second = TreeEntries::new();
        second.insert("a.txt".to_string(), oid('2'));
        second.insert("z.txt".to_string(), oid('1'));

        assert_eq!(
            Tree::new(first).object_id().unwrap(),
            Tree::new(second).object_id().unwrap()
        );
    }

    #[test]
    fn truncated_entry_is_rejected() {
        let reader = Cursor::new(b"a.txt\0abc".to_vec());

        assert!(Tree::deserialize(reader).is_err());
    }
}
