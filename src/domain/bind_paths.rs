//! Container bind-path collection.
//!
//! Singularity takes a list of host directories to mount into the sandbox.
//! Each path the job touches is bound through its top-level directory
//! (`/scratch`, `/home`, ...); no two entries in the result overlap.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use crate::domain::AppError;

/// Accumulates host paths that must be visible inside the container.
#[derive(Debug, Default, Clone)]
pub struct BindPathCollector {
    paths: Vec<PathBuf>,
    node_variables: Vec<String>,
}

impl BindPathCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a path. Only absolute paths can be bound.
    pub fn add(&mut self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(AppError::config_error(format!(
                "Bind path must be absolute: {}",
                path.display()
            )));
        }
        self.paths.push(path.to_path_buf());
        Ok(())
    }

    /// Record an unexpanded `$VAR` (or `${VAR}`) mount root such as `$LSCRATCH`.
    pub fn add_node_variable(&mut self, token: &str) -> Result<(), AppError> {
        if !token.starts_with('$') || token.len() < 2 || token.contains('/') {
            return Err(AppError::config_error(format!(
                "Bind variable must be a single $VAR reference: {}",
                token
            )));
        }
        self.node_variables.push(token.to_string());
        Ok(())
    }

    pub fn extend<I, P>(&mut self, paths: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.add(path)?;
        }
        Ok(())
    }

    /// Reduce the collected paths to their distinct top-level ancestors.
    pub fn minimize(&self) -> BindPathSet {
        BindPathSet {
            roots: self.paths.iter().map(|p| top_level_ancestor(p)).collect(),
            node_variables: self.node_variables.iter().cloned().collect(),
        }
    }
}

/// Minimized set of mount roots.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BindPathSet {
    roots: BTreeSet<PathBuf>,
    node_variables: BTreeSet<String>,
}

impl BindPathSet {
    /// Host roots only; node variables are listed by `node_variables`.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(PathBuf::as_path)
    }

    pub fn node_variables(&self) -> impl Iterator<Item = &str> {
        self.node_variables.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roots.len() + self.node_variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.node_variables.is_empty()
    }

    /// Comma-separated list for `singularity exec -B`: host roots, then node variables.
    pub fn joined(&self) -> String {
        self.iter()
            .map(|p| p.display().to_string())
            .chain(self.node_variables.iter().cloned())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// First path component below the filesystem root.
///
/// `/a/b/c` maps to `/a`; `/a` and `/` map to themselves.
pub fn top_level_ancestor(path: &Path) -> PathBuf {
    let mut top = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => top.push(component.as_os_str()),
            Component::CurDir => continue,
            _ => {
                top.push(component.as_os_str());
                break;
            }
        }
    }
    top
}
