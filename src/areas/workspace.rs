//! Working tree access
//!
//! Paths handed to and returned from the workspace are relative to the
//! repository root and use `/` as separator on every platform.

use crate::GITLET_DIR;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [GITLET_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_blob(&self, path: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(path)?))
    }

    /// Every regular file below the root, sorted, skipping `.gitlet`
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.file_name().to_string_lossy().as_ref()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.to_repository_path(entry.path()))
            .collect::<Vec<_>>();

        files.sort();
        Ok(files)
    }

    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    fn to_repository_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.path.as_ref()).ok()?;
        let parts = relative
            .components()
            .map(|component| match component {
                Component::Normal(name) => name.to_str().map(str::to_string),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;

        Some(parts.join("/"))
    }

    fn to_absolute_path(&self, path: &str) -> PathBuf {
        path.split('/')
            .fold(self.path.to_path_buf(), |absolute, part| absolute.join(part))
    }

    /// Normalize a user-supplied path to the repository form
    ///
    /// Returns `None` when the path escapes the repository or points into
    /// `.gitlet`.
    pub fn normalize(&self, path: &str) -> Option<String> {
        let path = Path::new(path);
        let relative = if path.is_absolute() {
            path.strip_prefix(self.path.as_ref()).ok()?
        } else {
            path
        };
        let mut parts: Vec<String> = Vec::new();

        for component in relative.components() {
            match component {
                Component::Normal(name) => parts.push(name.to_str()?.to_string()),
                Component::CurDir => {}
                Component::ParentDir => {
                    parts.pop()?;
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        match parts.first() {
            None => None,
            Some(first) if first == GITLET_DIR => None,
            Some(_) => Some(parts.join("/")),
        }
    }

    pub fn is_file(&self, path: &str) -> bool {
        self.to_absolute_path(path).is_file()
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.to_absolute_path(path).is_dir()
    }

    pub fn read_file(&self, path: &str) -> anyhow::Result<Bytes> {
        let absolute = self.to_absolute_path(path);
        let content = std::fs::read(&absolute)
            .with_context(|| format!("Failed to read file: {path}"))?;

        Ok(Bytes::from(content))
    }

    /// Write `data` to `path`, creating parent directories as needed
    pub fn write_file(&self, path: &str, data: &[u8]) -> anyhow::Result<()> {
        let absolute = self.to_absolute_path(path);

        if let Some(parent) = absolute.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create parent directories for: {path}"))?;
        }
        if absolute.is_dir() {
            std::fs::remove_dir_all(&absolute)
                .with_context(|| format!("Failed to remove existing directory: {path}"))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&absolute)
            .with_context(|| format!("Failed to open file: {path}"))?;
        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {path}"))?;

        Ok(())
    }

    /// Delete `path` if present and prune parent directories left empty
    pub fn remove_file(&self, path: &str) -> anyhow::Result<()> {
        let absolute = self.to_absolute_path(path);

        if absolute.is_file() {
            std::fs::remove_file(&absolute)
                .with_context(|| format!("Failed to remove file: {path}"))?;
        }

        let mut parent = absolute.parent();
        while let Some(dir) = parent {
            if dir == self.path.as_ref() {
                break;
            }
            // stops at the first directory that still has entries
            if std::fs::remove_dir(dir).is_err() {
                break;
            }
            parent = dir.parent();
        }

        Ok(())
    }

    // Deletions run first so a directory being replaced by a file is already
    // gone when the file is written.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for path in migration.deletions() {
            self.remove_file(path)?;
        }

        for (path, oid) in migration.writes() {
            let data = migration.load_blob_data(oid)?;
            self.write_file(path, &data)?;
        }

        Ok(())
    }
}
