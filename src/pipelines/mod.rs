//! Per-workflow hooks.
//!
//! A pipeline declares the file dependencies it needs, validates its own
//! configuration keys, and supplies the body of the run script. Validation
//! returns everything it wants added to the job as a `PipelineContribution`;
//! nothing is written to disk until the scaffolder takes over.

mod larnd2supera;
mod larndsim;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde_yaml::Value;

use crate::domain::{AppError, DependencySpec, GeneratedFile, JobConfig, config_value};
use crate::ports::JobFilesystem;

pub use larnd2supera::Larnd2SuperaPipeline;
pub use larndsim::LarndsimPipeline;

/// Config key selecting the pipeline.
pub const PIPELINE_KEY: &str = "PIPELINE";

pub trait Pipeline {
    fn name(&self) -> &'static str;

    /// File dependencies resolved through `USE_<NAME>` / `SEARCH_<NAME>`.
    fn dependencies(&self) -> Vec<DependencySpec> {
        Vec::new()
    }

    /// Check pipeline-specific keys. Must not touch the filesystem beyond
    /// read-only probes.
    fn validate_config(
        &self,
        config: &JobConfig,
        fs: &dyn JobFilesystem,
    ) -> Result<PipelineContribution, AppError>;

    /// Shell commands run inside the container. Only basenames of files in
    /// the job-source directory may appear.
    fn build_run_script_body(&self, config: &JobConfig) -> Result<String, AppError>;
}

/// What a pipeline adds to the job on top of the core dependencies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineContribution {
    /// Host files copied into job-source under their basename.
    pub copy_files: Vec<PathBuf>,
    /// Files written into job-source from memory.
    pub generated_files: Vec<GeneratedFile>,
    /// Extra host paths the container must see.
    pub bind_paths: Vec<PathBuf>,
    /// Keys set on the resolved configuration before rendering.
    pub config_updates: Vec<(String, Value)>,
}

/// Supported pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Larndsim,
    Larnd2Supera,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 2] = [PipelineKind::Larndsim, PipelineKind::Larnd2Supera];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineKind::Larndsim => "larndsim",
            PipelineKind::Larnd2Supera => "larnd2supera",
        }
    }

    /// Read the `PIPELINE` key from raw configuration.
    pub fn from_config(values: &serde_yaml::Mapping) -> Result<Self, AppError> {
        config_value::required_string(values, PIPELINE_KEY)?.parse()
    }

    pub fn build(&self) -> Box<dyn Pipeline> {
        match self {
            PipelineKind::Larndsim => Box::new(LarndsimPipeline::from_env()),
            PipelineKind::Larnd2Supera => Box::new(Larnd2SuperaPipeline::new()),
        }
    }
}

impl FromStr for PipelineKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL.into_iter().find(|kind| kind.as_str() == wanted).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(PipelineKind::as_str).collect();
            AppError::config_error(format!(
                "Unknown {} '{}' (expected one of: {})",
                PIPELINE_KEY,
                wanted,
                known.join(", ")
            ))
        })
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
