//! Typed access to raw configuration values.
//!
//! Configuration documents are loose YAML mappings: numbers may arrive as
//! strings and strings as numbers. These helpers coerce scalars into the
//! types the resolver needs and report the offending key on failure.

use serde_yaml::{Mapping, Value};

use crate::domain::AppError;

/// Render a scalar value as text. Sequences, mappings, and null yield `None`.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

pub fn contains(values: &Mapping, key: &str) -> bool {
    values.get(key).is_some_and(|value| !value.is_null())
}

pub fn optional_string(values: &Mapping, key: &str) -> Result<Option<String>, AppError> {
    match values.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_string(value)
            .map(Some)
            .ok_or_else(|| AppError::config_error(format!("{} must be a scalar value", key))),
    }
}

pub fn required_string(values: &Mapping, key: &str) -> Result<String, AppError> {
    optional_string(values, key)?.ok_or_else(|| missing(key))
}

pub fn required_positive_int(values: &Mapping, key: &str) -> Result<u64, AppError> {
    let value = values.get(key).filter(|v| !v.is_null()).ok_or_else(|| missing(key))?;
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n >= 1 => Ok(n),
        _ => Err(AppError::config_error(format!(
            "{} must be a positive integer (got {})",
            key,
            describe(value)
        ))),
    }
}

pub fn required_positive_number(values: &Mapping, key: &str) -> Result<f64, AppError> {
    let value = values.get(key).filter(|v| !v.is_null()).ok_or_else(|| missing(key))?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n > 0.0 && n.is_finite() => Ok(n),
        _ => Err(AppError::config_error(format!(
            "{} must be a positive number (got {})",
            key,
            describe(value)
        ))),
    }
}

pub fn optional_bool(values: &Mapping, key: &str, default: bool) -> Result<bool, AppError> {
    match values.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(AppError::config_error(format!(
            "{} must be true or false (got {})",
            key,
            describe(other)
        ))),
    }
}

fn missing(key: &str) -> AppError {
    AppError::config_error(format!("{} key is missing in the configuration", key))
}

fn describe(value: &Value) -> String {
    scalar_string(value).unwrap_or_else(|| "a non-scalar value".to_string())
}
