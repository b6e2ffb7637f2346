use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type for simjob operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Missing, conflicting, or semantically invalid configuration keys.
    #[error("{0}")]
    Configuration(String),

    /// A named file does not exist at its resolved location.
    #[error("{name} not found at {}", path.display())]
    DependencyNotFound { name: String, path: PathBuf },

    /// The per-invocation storage directory already exists.
    #[error("Storage directory already exists: {}", .0.display())]
    StorageConflict(PathBuf),

    /// The configuration document is not valid YAML.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Script template could not be loaded or rendered.
    #[error("Template error: {0}")]
    Template(String),

    /// Glob pattern is malformed or could not be expanded.
    #[error("Invalid pattern '{pattern}': {details}")]
    InvalidPattern { pattern: String, details: String },
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn dependency_not_found(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        AppError::DependencyNotFound { name: name.into(), path: path.into() }
    }

    /// Provide an `io::ErrorKind`-like view for callers expecting legacy behavior.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::ConfigParse(_)
            | AppError::InvalidPattern { .. } => io::ErrorKind::InvalidInput,
            AppError::DependencyNotFound { .. } => io::ErrorKind::NotFound,
            AppError::StorageConflict(_) => io::ErrorKind::AlreadyExists,
            AppError::Template(_) => io::ErrorKind::Other,
        }
    }
}
