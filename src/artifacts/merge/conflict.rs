use bytes::{BufMut, Bytes, BytesMut};

const CURRENT_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const SEPARATOR_MARKER: &[u8] = b"=======\n";

/// Content written for a path changed differently on both sides
///
/// A deleted side contributes no bytes. Side contents are copied verbatim, so
/// a side without a trailing newline runs straight into the next marker.
pub fn conflict_markers(current: Option<&[u8]>, other: Option<&[u8]>, other_branch: &str) -> Bytes {
    let current = current.unwrap_or_default();
    let other = other.unwrap_or_default();

    let mut content = BytesMut::with_capacity(current.len() + other.len() + 64);
    content.put_slice(CURRENT_MARKER);
    content.put_slice(current);
    content.put_slice(SEPARATOR_MARKER);
    content.put_slice(other);
    content.put_slice(format!(">>>>>>> {other_branch}\n").as_bytes());

    content.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Some("mine\n"), Some("theirs\n"), "<<<<<<< HEAD\nmine\n=======\ntheirs\n>>>>>>> other\n")]
    #[case(None, Some("theirs\n"), "<<<<<<< HEAD\n=======\ntheirs\n>>>>>>> other\n")]
    #[case(Some("mine\n"), None, "<<<<<<< HEAD\nmine\n=======\n>>>>>>> other\n")]
    #[case(Some("no newline"), Some("x\n"), "<<<<<<< HEAD\nno newline=======\nx\n>>>>>>> other\n")]
    fn formats_both_sides(
        #[case] current: Option<&str>,
        #[case] other: Option<&str>,
        #[case] expected: &str,
    ) {
        let content = conflict_markers(
            current.map(str::as_bytes),
            other.map(str::as_bytes),
            "other",
        );

        assert_eq!(String::from_utf8_lossy(&content), expected);
    }
}
