use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusInfo;
use std::io::Write;

impl Repository {
    pub async fn status(&mut self) -> anyhow::Result<()> {
        let state = self.state();
        let mut state = state.lock().await;
        state.rehydrate()?;

        let head_tree = self.head_tree(&state)?;
        let status = StatusInfo::collect(state.refs(), state.index(), &head_tree, self.workspace())?;

        let use_color = colored::control::SHOULD_COLORIZE.should_colorize();
        write!(self.writer(), "{}", status.render(use_color)?)?;

        Ok(())
    }
}
