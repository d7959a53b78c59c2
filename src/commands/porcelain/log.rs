use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GitletError;
use std::io::Write;

const ENTRY_SEPARATOR: &str = "===";

impl Repository {
    /// First-parent history of the current branch, newest first
    pub async fn log(&mut self) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;
        state.rehydrate()?;

        let head_oid = state.refs().read_head()?;

        for entry in self.commit_graph().history(head_oid) {
            let (commit_oid, commit) = entry?;
            self.show_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    /// Every commit reachable from any branch, each shown once
    pub async fn global_log(&mut self) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;
        state.rehydrate()?;

        let graph = self.commit_graph();
        for entry in graph.all_commits(state.refs().tips()) {
            let (commit_oid, commit) = entry?;
            self.show_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    /// Ids of every stored commit whose message is exactly `message`
    pub async fn find(&mut self, message: &str) -> anyhow::Result<()> {
        let mut found = false;

        for commit_oid in self.database().commit_ids()? {
            let commit = self.database().parse_object_as_commit(&commit_oid)?;
            if commit.message() == message {
                writeln!(self.writer(), "{commit_oid}")?;
                found = true;
            }
        }

        if !found {
            return Err(GitletError::NoCommitWithMessage.into());
        }

        Ok(())
    }

    fn show_commit(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "{ENTRY_SEPARATOR}")?;
        writeln!(writer, "commit {commit_oid}")?;
        if let [first, second, ..] = commit.parents() {
            writeln!(
                writer,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.author().readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
