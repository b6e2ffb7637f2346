use std::fmt;

use crate::domain::AppError;

/// Per-invocation token that keeps concurrent jobs on one storage root apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueToken(String);

impl UniqueToken {
    /// Create a token from caller-supplied text.
    ///
    /// The token becomes part of directory and file names, so it must be
    /// non-empty and limited to alphanumerics, hyphens, and underscores.
    pub fn new(value: impl Into<String>) -> Result<Self, AppError> {
        let value = value.into();
        if value.is_empty()
            || !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AppError::config_error(format!(
                "Invalid job token '{}': must be alphanumeric with hyphens or underscores",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Token derived from the current process id.
    pub fn from_process() -> Self {
        Self(std::process::id().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UniqueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
