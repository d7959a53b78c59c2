use crate::common::command::{
    NOTWUG, WUG, commit_file, gitlet_commit, head_commit_id, init_repository_dir,
    log_commit_ids, run_gitlet_command, status_report,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use rstest::rstest;

mod common;

#[rstest]
fn reset_moves_the_branch_and_restores_files(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_commit_id(dir);
    let history = log_commit_ids(dir);
    commit_file(dir, "notwug.txt", NOTWUG, "added notwug");
    commit_file(dir, "wug.txt", NOTWUG, "changed wug");
    write_file(FileSpec::new(dir.join("staged.txt"), WUG.to_string()));
    run_gitlet_command(dir, &["add", "staged.txt"])
        .assert()
        .success();

    run_gitlet_command(dir, &["reset", &first[..6]])
        .assert()
        .success()
        .stdout("");

    assert_eq!(log_commit_ids(dir), history);
    assert_eq!(read_file(&dir.join("wug.txt")), WUG);
    assert!(!dir.join("notwug.txt").exists());
    run_gitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(status_report(&["*main"], &[], &[], &[], &["staged.txt"]));
}

#[rstest]
fn reset_to_an_unknown_commit_fails(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["reset", "0000000000"])
        .assert()
        .code(1)
        .stdout("No commit with that id exists.\n");
}

#[rstest]
fn reset_refuses_to_overwrite_an_untracked_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "notwug.txt", NOTWUG, "added notwug");
    let target = head_commit_id(dir);
    run_gitlet_command(dir, &["rm", "notwug.txt"])
        .assert()
        .success();
    gitlet_commit(dir, "removed notwug")
        .assert()
        .success();
    let head = head_commit_id(dir);

    write_file(FileSpec::new(dir.join("notwug.txt"), WUG.to_string()));

    run_gitlet_command(dir, &["reset", &target])
        .assert()
        .code(1)
        .stdout("There is an untracked file in the way; delete it, or add and commit it first.\n");

    assert_eq!(head_commit_id(dir), head);
    assert_eq!(read_file(&dir.join("notwug.txt")), WUG);
}
