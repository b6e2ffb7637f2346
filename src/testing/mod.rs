mod faulty_filesystem;
mod job_config_builder;

pub use faulty_filesystem::{Fault, FaultyFilesystem};
pub use job_config_builder::JobConfigBuilder;
