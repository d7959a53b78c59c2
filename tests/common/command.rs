use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const WUG: &str = "This is a wug.\n";
pub const NOTWUG: &str = "This is not a wug.\n";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Initialized repository with `wug.txt` committed on `main`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("wug.txt"),
        WUG.to_string(),
    ));
    run_gitlet_command(repository_dir.path(), &["add", "wug.txt"])
        .assert()
        .success();
    gitlet_commit(repository_dir.path(), "added wug")
        .assert()
        .success();

    repository_dir
}

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find gitlet binary");
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("GITLET_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gitlet_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_gitlet_command(dir, &["commit", message]);
    cmd.envs(vec![
        ("GITLET_AUTHOR_NAME", "fake_user"),
        ("GITLET_AUTHOR_EMAIL", "fake_email@email.com"),
        ("GITLET_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

/// Stage and commit a single file with the given content
pub fn commit_file(dir: &Path, path: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(path), content.to_string()));
    run_gitlet_command(dir, &["add", path]).assert().success();
    gitlet_commit(dir, message).assert().success();
}

/// Commit ids printed by `log`, newest first
pub fn log_commit_ids(dir: &Path) -> Vec<String> {
    let output = run_gitlet_command(dir, &["log"])
        .output()
        .expect("Failed to run gitlet log");
    let stdout = String::from_utf8(output.stdout).expect("log output is not UTF-8");

    stdout
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(str::to_string)
        .collect()
}

pub fn head_commit_id(dir: &Path) -> String {
    log_commit_ids(dir)
        .into_iter()
        .next()
        .expect("log printed no commits")
}

/// Render the status report the way `status` prints it without colour
pub fn status_report(
    branches: &[&str],
    staged: &[&str],
    removed: &[&str],
    modified: &[&str],
    untracked: &[&str],
) -> String {
    let section = |title: &str, entries: &[&str]| {
        let mut text = format!("=== {title} ===\n");
        for entry in entries {
            text.push_str(entry);
            text.push('\n');
        }
        text.push('\n');
        text
    };

    [
        section("Branches", branches),
        section("Staged Files", staged),
        section("Removed Files", removed),
        section("Modifications Not Staged For Commit", modified),
        section("Untracked Files", untracked),
    ]
    .concat()
}
