//! `JobFilesystem` implementation backed by `std::fs`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::AppError;
use crate::ports::JobFilesystem;

/// The submission host's filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl JobFilesystem for LocalFilesystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling link still counts as occupied
        fs::symlink_metadata(path).is_ok()
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, AppError> {
        fs::canonicalize(path).map_err(AppError::from)
    }

    fn current_dir(&self) -> Result<PathBuf, AppError> {
        std::env::current_dir().map_err(AppError::from)
    }

    fn create_dir(&self, path: &Path) -> Result<(), AppError> {
        fs::create_dir(path).map_err(AppError::from)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError> {
        fs::write(path, content).map_err(AppError::from)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<u64, AppError> {
        fs::copy(from, to).map_err(AppError::from)
    }

    fn set_executable(&self, path: &Path) -> Result<(), AppError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).map_err(AppError::from)?.permissions();
            perms.set_mode(0o755);
            fs::set_permissions(path, perms).map_err(AppError::from)?;
        }
        #[cfg(not(unix))]
        let _ = path;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<(), AppError> {
        if self.exists(path) {
            fs::remove_file(path).map_err(AppError::from)?;
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), AppError> {
        if path.exists() {
            fs::remove_dir_all(path).map_err(AppError::from)?;
        }
        Ok(())
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, AppError> {
        let entries = glob::glob(pattern).map_err(|e| AppError::InvalidPattern {
            pattern: pattern.to_string(),
            details: e.to_string(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| AppError::InvalidPattern {
                pattern: pattern.to_string(),
                details: e.to_string(),
            })?;
            paths.push(path);
        }
        paths.sort();
        Ok(paths)
    }
}
