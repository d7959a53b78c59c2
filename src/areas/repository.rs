use crate::GITLET_DIR;
use crate::areas::database::Database;
use crate::areas::state::RepositoryState;
use crate::areas::workspace::Workspace;
use crate::artifacts::log::commit_graph::CommitGraph;
use crate::artifacts::objects::tree::TreeEntries;
use crate::errors::GitletError;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

const OBJECTS_DIR: &str = "objects";
const STATE_FILE: &str = "state";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    state: Arc<Mutex<RepositoryState>>,
    database: Database,
    workspace: Workspace,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let gitlet_path = path.join(GITLET_DIR);
        let state = RepositoryState::new(gitlet_path.join(STATE_FILE).into_boxed_path());
        let database = Database::new(gitlet_path.join(OBJECTS_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            state: Arc::new(Mutex::new(state)),
            database,
            workspace,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn gitlet_path(&self) -> PathBuf {
        self.path.join(GITLET_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn state(&self) -> Arc<Mutex<RepositoryState>> {
        self.state.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn commit_graph(&self) -> CommitGraph<'_> {
        CommitGraph::new(&self.database)
    }

    pub fn is_initialized(&self) -> bool {
        self.gitlet_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(GitletError::NotInitialized.into())
        }
    }

    /// Snapshot recorded by the commit the current branch points at
    pub fn head_tree(&self, state: &RepositoryState) -> anyhow::Result<TreeEntries> {
        let head_oid = state.refs().read_head()?;

        Ok(self.database.load_commit_tree(&head_oid)?.into_entries())
    }
}
