//! Host filesystem operations used while resolving and scaffolding a job.
//!
//! Resolution only probes; the scaffolder is the sole caller of the mutating
//! methods, and every object it creates is recorded so a failed invocation
//! can remove exactly what it made.

use std::path::{Path, PathBuf};

use crate::domain::AppError;

/// Port for host filesystem access.
///
/// All paths are absolute; implementations do not resolve against a root.
pub trait JobFilesystem {
    /// Whether `path` is a regular file (symlinks followed).
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` is a directory (symlinks followed).
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Resolve symlinks and produce an absolute path.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, AppError>;

    /// Directory that relative config paths are resolved against.
    fn current_dir(&self) -> Result<PathBuf, AppError>;

    /// Create a single directory. Fails if it already exists.
    fn create_dir(&self, path: &Path) -> Result<(), AppError>;

    /// Write UTF-8 content to a new or existing file.
    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError>;

    /// Copy a file's content, returning the number of bytes copied.
    fn copy_file(&self, from: &Path, to: &Path) -> Result<u64, AppError>;

    /// Set the executable bit on a file (Unix-only).
    fn set_executable(&self, path: &Path) -> Result<(), AppError>;

    /// Remove a file. No-op if the file does not exist.
    fn remove_file(&self, path: &Path) -> Result<(), AppError>;

    /// Remove a directory and all its contents. No-op if absent.
    fn remove_dir_all(&self, path: &Path) -> Result<(), AppError>;

    /// Expand a glob pattern into matching paths, sorted.
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, AppError>;
}
