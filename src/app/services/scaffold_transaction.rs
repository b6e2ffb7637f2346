//! Records filesystem objects created while scaffolding so a failure can
//! remove exactly those and nothing else.

use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::domain::AppError;
use crate::ports::JobFilesystem;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Created {
    Dir(PathBuf),
    File(PathBuf),
}

/// Deferred cleanup scope for one scaffolding run.
///
/// Dropping an uncommitted transaction rolls it back.
pub struct ScaffoldTransaction<'a> {
    fs: &'a dyn JobFilesystem,
    created: Vec<Created>,
    committed: bool,
}

impl<'a> ScaffoldTransaction<'a> {
    pub fn new(fs: &'a dyn JobFilesystem) -> Self {
        Self { fs, created: Vec::new(), committed: false }
    }

    /// Create a directory that must not already exist.
    pub fn create_dir(&mut self, path: &Path) -> Result<(), AppError> {
        match self.fs.create_dir(path) {
            Ok(()) => {
                self.created.push(Created::Dir(path.to_path_buf()));
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(AppError::StorageConflict(path.to_path_buf()))
            }
            Err(err) => Err(err),
        }
    }

    pub fn write_file(&mut self, path: &Path, content: &str) -> Result<(), AppError> {
        self.guard_new_file(path)?;
        // Recorded first: a partial write still leaves a file behind.
        self.created.push(Created::File(path.to_path_buf()));
        self.fs.write_file(path, content)
    }

    pub fn copy_file(&mut self, from: &Path, to: &Path) -> Result<u64, AppError> {
        self.guard_new_file(to)?;
        self.created.push(Created::File(to.to_path_buf()));
        self.fs.copy_file(from, to)
    }

    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Remove every recorded object, newest first.
    ///
    /// Removal errors are logged and returned; the caller keeps reporting its
    /// own error.
    pub fn rollback(mut self) -> Vec<AppError> {
        self.undo()
    }

    fn guard_new_file(&self, path: &Path) -> Result<(), AppError> {
        if self.fs.exists(path) {
            return Err(AppError::config_error(format!(
                "Refusing to overwrite existing file {}",
                path.display()
            )));
        }
        Ok(())
    }

    fn undo(&mut self) -> Vec<AppError> {
        let mut failures = Vec::new();
        while let Some(object) = self.created.pop() {
            let result = match &object {
                Created::File(path) => self.fs.remove_file(path),
                Created::Dir(path) => self.fs.remove_dir_all(path),
            };
            if let Err(err) = result {
                error!(object = ?object, error = %err, "Rollback failed to remove object");
                failures.push(err);
            }
        }
        self.committed = true;
        failures
    }
}

impl Drop for ScaffoldTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed && !self.created.is_empty() {
            warn!(objects = self.created.len(), "Scaffold abandoned; rolling back");
            self.undo();
        }
    }
}
