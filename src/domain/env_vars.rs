//! Expansion of `$VAR` and `${VAR}` references in host paths.

use crate::domain::AppError;

/// Expand environment variable references using `lookup`.
///
/// A `$` not followed by an identifier or `{` is kept literally.
/// Unset variables are a configuration error.
pub fn expand_with<F>(input: &str, lookup: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_ascii_alphanumeric() || next == '_' {
                name.push(next);
                chars.next();
            } else {
                break;
            }
        }

        if braced {
            match chars.next() {
                Some('}') if !name.is_empty() => {}
                _ => {
                    return Err(AppError::config_error(format!(
                        "Unterminated variable reference in '{}'",
                        input
                    )));
                }
            }
        } else if name.is_empty() {
            out.push('$');
            continue;
        }

        let value = lookup(&name).ok_or_else(|| {
            AppError::config_error(format!(
                "Environment variable '{}' referenced in '{}' is not set",
                name, input
            ))
        })?;
        out.push_str(&value);
    }

    Ok(out)
}

/// Expand against the process environment.
pub fn expand(input: &str) -> Result<String, AppError> {
    expand_with(input, |name| std::env::var(name).ok())
}
