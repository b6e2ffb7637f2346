//! API Facade for the application.
//!
//! Glues configuration loading, pipeline selection, and the local filesystem
//! to the scaffolding command.

use std::path::Path;

use serde_yaml::Mapping;

use crate::adapters::LocalFilesystem;
use crate::app::commands::generate;
use crate::app::config::load_raw_config;
use crate::pipelines::PipelineKind;

pub use crate::app::commands::generate::ScaffoldSummary;
pub use crate::domain::{AppError, UniqueToken};

/// Scaffold a job from a configuration file, keyed by the current process id.
pub fn generate(config_path: &Path) -> Result<ScaffoldSummary, AppError> {
    generate_with_token(config_path, &UniqueToken::from_process())
}

/// Scaffold a job from a configuration file with an explicit token.
pub fn generate_with_token(
    config_path: &Path,
    token: &UniqueToken,
) -> Result<ScaffoldSummary, AppError> {
    let raw = load_raw_config(config_path)?;
    generate_from_mapping(&raw, token)
}

/// Scaffold a job from an already-parsed configuration mapping.
pub fn generate_from_mapping(
    raw: &Mapping,
    token: &UniqueToken,
) -> Result<ScaffoldSummary, AppError> {
    let kind = PipelineKind::from_config(raw)?;
    let pipeline = kind.build();
    generate::execute(raw, pipeline.as_ref(), token, &LocalFilesystem::new())
}
