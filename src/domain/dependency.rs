//! File dependencies and their two lookup modes.

use std::path::{Path, PathBuf};

use serde_yaml::Mapping;

use crate::domain::{AppError, config_value};

/// A logical file a pipeline needs copied into the job-source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Logical name, e.g. `GEOMETRY`. Config keys are `USE_<name>` / `SEARCH_<name>`.
    pub name: String,
    /// Base directory joined with a `SEARCH_<name>` value.
    pub search_base: PathBuf,
}

impl DependencySpec {
    pub fn new(name: impl Into<String>, search_base: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), search_base: search_base.into() }
    }

    pub fn use_key(&self) -> String {
        format!("USE_{}", self.name)
    }

    pub fn search_key(&self) -> String {
        format!("SEARCH_{}", self.name)
    }

    /// Read the lookup mode from raw configuration.
    ///
    /// Exactly one of `USE_<name>` and `SEARCH_<name>` must be present.
    pub fn lookup(&self, values: &Mapping) -> Result<DependencyLookup, AppError> {
        let use_key = self.use_key();
        let search_key = self.search_key();

        match (
            config_value::optional_string(values, &use_key)?,
            config_value::optional_string(values, &search_key)?,
        ) {
            (Some(_), Some(_)) => Err(AppError::config_error(format!(
                "Both {} and {} are set for {} (only one is allowed)",
                use_key, search_key, self.name
            ))),
            (None, None) => Err(AppError::config_error(format!(
                "Missing {} dependency: set either {} or {}",
                self.name, use_key, search_key
            ))),
            (Some(path), None) => Ok(DependencyLookup::Use(path)),
            (None, Some(name)) => Ok(DependencyLookup::Search(name)),
        }
    }

    /// Candidate path for a `SEARCH_<name>` value.
    ///
    /// The value is joined onto the search base; a still-relative result is
    /// re-rooted under the repository.
    pub fn search_path(&self, name: &str, repository: &Path) -> PathBuf {
        let path = self.search_base.join(name);
        if path.is_absolute() { path } else { repository.join(path) }
    }
}

/// How the user asked for a dependency to be located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyLookup {
    /// Explicit path to the file.
    Use(String),
    /// Name resolved against the dependency's search base.
    Search(String),
}

/// A dependency resolved to an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDependency {
    pub name: String,
    /// Absolute path on the submission host.
    pub source: PathBuf,
    /// Name of the copy inside the job-source directory.
    pub file_name: String,
}

impl FileDependency {
    pub fn new(name: impl Into<String>, source: PathBuf) -> Result<Self, AppError> {
        let name = name.into();
        let file_name = basename(&source)?;
        Ok(Self { name, source, file_name })
    }
}

/// Final path component as UTF-8 text.
pub fn basename(path: &Path) -> Result<String, AppError> {
    path.file_name().and_then(|n| n.to_str()).map(str::to_string).ok_or_else(|| {
        AppError::config_error(format!("Path has no usable file name: {}", path.display()))
    })
}
