//! Fully resolved job configuration.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::domain::{AppError, FileDependency, UniqueToken, config_value, layout};

/// Directories that make up one job's storage tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    pub storage_dir: PathBuf,
    pub job_source_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl JobPaths {
    pub fn new(storage_dir: PathBuf) -> Self {
        Self {
            job_source_dir: layout::job_source_dir(&storage_dir),
            log_dir: layout::log_dir(&storage_dir),
            storage_dir,
        }
    }
}

/// Singularity image used to run the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerImage {
    /// Real path of the configured image (symlinks resolved).
    pub source: PathBuf,
    /// Path the job runs from: a copy in the storage dir, or `source` itself.
    pub destination: PathBuf,
    /// Whether the image is copied into the storage tree.
    pub store: bool,
}

/// Slurm resource request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulingParams {
    pub partition: String,
    pub cpus: u64,
    pub mem_per_cpu_gb: u64,
    /// Wall time in `HH:MM:SS` (or the user's verbatim string).
    pub time: String,
    pub num_jobs: u64,
    /// `SLURM_WORK_DIR` as written; the compute node's shell expands it.
    pub work_dir: String,
    #[serde(skip)]
    pub work_dir_mount: WorkDirMount,
    pub gpu: Option<String>,
    pub exclude: Option<String>,
    pub nodelist: Option<String>,
}

/// How the work directory is exposed to the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkDirMount {
    /// An absolute host path, bound through its top-level directory.
    Host(PathBuf),
    /// A leading `$VAR` reference left for the compute node to expand.
    NodeVariable(String),
}

/// Resolved configuration: the ordered key/value record plus typed views.
///
/// `values` holds every user key and every derived key; it is what gets
/// serialized into the job-source directory. The typed fields are derived
/// from the same data and never diverge from it.
#[derive(Debug, Clone)]
pub struct JobConfig {
    token: UniqueToken,
    values: Mapping,
    pub paths: JobPaths,
    pub image: ContainerImage,
    pub scheduling: SchedulingParams,
    pub dependencies: Vec<FileDependency>,
}

impl JobConfig {
    pub fn new(
        token: UniqueToken,
        values: Mapping,
        paths: JobPaths,
        image: ContainerImage,
        scheduling: SchedulingParams,
        dependencies: Vec<FileDependency>,
    ) -> Self {
        Self { token, values, paths, image, scheduling, dependencies }
    }

    pub fn token(&self) -> &UniqueToken {
        &self.token
    }

    pub fn values(&self) -> &Mapping {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        config_value::contains(&self.values, key)
    }

    pub fn optional_string(&self, key: &str) -> Result<Option<String>, AppError> {
        config_value::optional_string(&self.values, key)
    }

    pub fn require_string(&self, key: &str) -> Result<String, AppError> {
        config_value::required_string(&self.values, key)
    }

    pub fn require_positive_int(&self, key: &str) -> Result<u64, AppError> {
        config_value::required_positive_int(&self.values, key)
    }

    /// Insert or replace a key. Existing keys keep their position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(Value::String(key.into()), value.into());
    }

    pub fn dependency(&self, name: &str) -> Option<&FileDependency> {
        self.dependencies.iter().find(|dep| dep.name == name)
    }

    /// Basename of a resolved dependency, as seen from inside the job.
    pub fn dependency_file_name(&self, name: &str) -> Result<&str, AppError> {
        self.dependency(name).map(|dep| dep.file_name.as_str()).ok_or_else(|| {
            AppError::config_error(format!("Dependency {} was not resolved", name))
        })
    }

    pub fn job_output_id(&self) -> &'static str {
        layout::JOB_OUTPUT_ID
    }

    /// Serialize the resolved record as YAML.
    pub fn to_yaml(&self) -> Result<String, AppError> {
        Ok(serde_yaml::to_string(&self.values)?)
    }
}

/// Format a duration in seconds as Slurm's `HH:MM:SS`.
///
/// Hours are not wrapped into days: 90000 seconds is `25:00:00`.
pub fn format_wall_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Render a path for the YAML record.
pub fn path_value(path: &Path) -> Value {
    Value::String(path.display().to_string())
}
