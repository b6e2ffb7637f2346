pub mod bind_paths;
pub mod config_value;
pub mod dependency;
pub mod env_vars;
pub mod error;
pub mod job_config;
pub mod layout;
pub mod script;
pub mod token;

pub use bind_paths::{BindPathCollector, BindPathSet, top_level_ancestor};
pub use dependency::{DependencyLookup, DependencySpec, FileDependency};
pub use error::AppError;
pub use job_config::{ContainerImage, JobConfig, JobPaths, SchedulingParams, WorkDirMount};
pub use script::{GeneratedFile, RenderedScript};
pub use token::UniqueToken;
