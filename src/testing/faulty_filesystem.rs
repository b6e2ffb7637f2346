use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::adapters::LocalFilesystem;
use crate::domain::AppError;
use crate::ports::JobFilesystem;

/// Operation to sabotage, matched by the target path's file name.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Fault {
    CreateDir(&'static str),
    WriteFile(&'static str),
    CopyFile(&'static str),
    RemoveDirAll(&'static str),
}

/// Real filesystem that fails one chosen operation and records removals.
#[derive(Debug)]
pub struct FaultyFilesystem {
    inner: LocalFilesystem,
    faults: Vec<Fault>,
    removed: RefCell<Vec<PathBuf>>,
}

#[allow(dead_code)]
impl FaultyFilesystem {
    pub fn new(faults: Vec<Fault>) -> Self {
        Self { inner: LocalFilesystem::new(), faults, removed: RefCell::new(Vec::new()) }
    }

    /// Paths passed to `remove_file` / `remove_dir_all`, in call order.
    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.borrow().clone()
    }

    fn check(&self, matches: impl Fn(&Fault) -> Option<&'static str>, path: &Path) -> Result<(), AppError> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if self.faults.iter().filter_map(matches).any(|target| target == name) {
            return Err(AppError::Io(std::io::Error::other(format!(
                "injected fault at {}",
                path.display()
            ))));
        }
        Ok(())
    }
}

impl JobFilesystem for FaultyFilesystem {
    fn is_file(&self, path: &Path) -> bool {
        self.inner.is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, AppError> {
        self.inner.canonicalize(path)
    }

    fn current_dir(&self) -> Result<PathBuf, AppError> {
        self.inner.current_dir()
    }

    fn create_dir(&self, path: &Path) -> Result<(), AppError> {
        self.check(|f| if let Fault::CreateDir(n) = f { Some(*n) } else { None }, path)?;
        self.inner.create_dir(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError> {
        self.check(|f| if let Fault::WriteFile(n) = f { Some(*n) } else { None }, path)?;
        self.inner.write_file(path, content)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<u64, AppError> {
        self.check(|f| if let Fault::CopyFile(n) = f { Some(*n) } else { None }, to)?;
        self.inner.copy_file(from, to)
    }

    fn set_executable(&self, path: &Path) -> Result<(), AppError> {
        self.inner.set_executable(path)
    }

    fn remove_file(&self, path: &Path) -> Result<(), AppError> {
        self.removed.borrow_mut().push(path.to_path_buf());
        self.inner.remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), AppError> {
        self.removed.borrow_mut().push(path.to_path_buf());
        self.check(|f| if let Fault::RemoveDirAll(n) = f { Some(*n) } else { None }, path)?;
        self.inner.remove_dir_all(path)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, AppError> {
        self.inner.glob(pattern)
    }
}
