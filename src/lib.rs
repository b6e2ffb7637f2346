//! simjob: scaffold self-contained Slurm job directories for containerized
//! simulation pipelines.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod pipelines;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{ScaffoldSummary, generate, generate_from_mapping, generate_with_token};
pub use app::commands::generate::execute as scaffold;
pub use domain::{AppError, BindPathCollector, BindPathSet, JobConfig, UniqueToken};
pub use pipelines::{Pipeline, PipelineContribution, PipelineKind};
pub use ports::JobFilesystem;
