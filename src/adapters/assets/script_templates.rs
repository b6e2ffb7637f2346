//! Script templates embedded in the binary.

use include_dir::{Dir, include_dir};

use crate::domain::AppError;

static SCRIPTS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/scripts");

/// An embedded template: registered under its file name (e.g. `submit.sh.j2`).
#[derive(Debug, Clone, Copy)]
pub struct ScriptTemplate {
    pub name: &'static str,
    pub source: &'static str,
}

/// All embedded script templates, sorted by name.
pub fn script_templates() -> Result<Vec<ScriptTemplate>, AppError> {
    let mut templates = Vec::new();
    for file in SCRIPTS_DIR.files() {
        let name = file.path().to_str().ok_or_else(|| {
            AppError::Template(format!("Template path is not UTF-8: {}", file.path().display()))
        })?;
        let source = file.contents_utf8().ok_or_else(|| {
            AppError::Template(format!("Template {} is not UTF-8", name))
        })?;
        templates.push(ScriptTemplate { name, source });
    }
    templates.sort_by(|a, b| a.name.cmp(b.name));
    Ok(templates)
}
