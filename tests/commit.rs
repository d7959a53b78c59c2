use crate::common::command::{
    NOTWUG, commit_file, gitlet_commit, head_commit_id, init_repository_dir, log_commit_ids, run_gitlet_command,
    status_report,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

mod common;

#[rstest]
fn commit_without_staged_changes_fails(init_repository_dir: TempDir) {
    gitlet_commit(init_repository_dir.path(), "Nothing here")
        .assert()
        .code(1)
        .stdout("No changes added to the commit.\n");
}

#[rstest]
#[case::empty_message(&["commit", ""])]
#[case::blank_message(&["commit", "   "])]
#[case::missing_message(&["commit"])]
fn commit_requires_a_message(init_repository_dir: TempDir, #[case] args: &[&str]) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("notwug.txt"), NOTWUG.to_string()));
    run_gitlet_command(dir, &["add", "notwug.txt"])
        .assert()
        .success();

    run_gitlet_command(dir, args)
        .assert()
        .code(1)
        .stdout("Please enter a commit message.\n");
}

#[rstest]
fn commit_clears_the_staging_area(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let parent = log_commit_ids(dir);

    commit_file(dir, "notwug.txt", NOTWUG, "added notwug");

    run_gitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(status_report(&["*main"], &[], &[], &[], &[]));
    let history = log_commit_ids(dir);
    assert_eq!(history.len(), parent.len() + 1);
    assert_eq!(&history[1..], &parent[..]);
}

#[rstest]
fn committed_removal_drops_the_file_from_the_snapshot(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["rm", "wug.txt"])
        .assert()
        .success();
    gitlet_commit(dir, "removed wug").assert().success();

    run_gitlet_command(dir, &["checkout", "--", "wug.txt"])
        .assert()
        .code(1)
        .stdout("File does not exist in that commit.\n");
    run_gitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(status_report(&["*main"], &[], &[], &[], &[]));
}

#[rstest]
fn commit_keeps_files_it_did_not_touch(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "notwug.txt", NOTWUG, "added notwug");

    std::fs::remove_file(dir.join("wug.txt")).unwrap();
    run_gitlet_command(dir, &["checkout", "--", "wug.txt"])
        .assert()
        .success();

    assert!(dir.join("wug.txt").is_file());
}

#[rstest]
fn commit_message_is_stored_as_given(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "notwug.txt", NOTWUG, "  padded message  ");
    let head = head_commit_id(dir);

    run_gitlet_command(dir, &["find", "  padded message  "])
        .assert()
        .success()
        .stdout(format!("{head}\n"));
    run_gitlet_command(dir, &["find", "padded message"])
        .assert()
        .code(1)
        .stdout("Found no commit with that message.\n");
}
