//! Raw configuration document loading.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::domain::AppError;

/// Required extension for configuration documents.
pub const CONFIG_EXTENSION: &str = "yaml";

/// Read and parse a configuration document from disk.
pub fn load_raw_config(path: &Path) -> Result<Mapping, AppError> {
    if !path.is_file() {
        return Err(AppError::dependency_not_found("Configuration file", path));
    }
    let content = fs::read_to_string(path)?;
    parse_raw_config(&content)
}

/// Parse a configuration document. The top level must be a mapping.
pub fn parse_raw_config(content: &str) -> Result<Mapping, AppError> {
    if content.trim().is_empty() {
        return Err(AppError::config_error("Configuration document is empty"));
    }
    match serde_yaml::from_str::<Value>(content)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Err(AppError::config_error("Configuration document is empty")),
        _ => Err(AppError::config_error("Configuration document must be a key/value mapping")),
    }
}
