//! Raw configuration -> `JobConfig`.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::domain::job_config::{format_wall_time, path_value};
use crate::domain::{
    AppError, ContainerImage, DependencyLookup, DependencySpec, FileDependency, JobConfig,
    JobPaths, SchedulingParams, UniqueToken, WorkDirMount, config_value, env_vars, layout,
};
use crate::ports::JobFilesystem;

/// Repository root used to resolve `SEARCH_<NAME>` keys.
pub const REPOSITORY_KEY: &str = "LARNDSIM_REPOSITORY";

/// Validates a raw configuration and derives the job's paths.
///
/// Only read-only probes are issued against the filesystem.
pub struct ConfigResolver<'a, F: JobFilesystem + ?Sized> {
    fs: &'a F,
}

impl<'a, F: JobFilesystem + ?Sized> ConfigResolver<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    pub fn resolve(
        &self,
        raw: &Mapping,
        dependencies: &[DependencySpec],
        token: &UniqueToken,
    ) -> Result<JobConfig, AppError> {
        // Lookup modes first: a USE/SEARCH conflict is reported whether or not
        // the referenced files exist.
        let lookups = dependencies
            .iter()
            .map(|spec| spec.lookup(raw).map(|lookup| (spec, lookup)))
            .collect::<Result<Vec<_>, _>>()?;

        let scheduling = self.resolve_scheduling(raw)?;
        let paths = self.resolve_storage(raw, token)?;
        let image = self.resolve_image(raw, &paths, token)?;

        let mut resolved = Vec::with_capacity(lookups.len());
        for (spec, lookup) in lookups {
            resolved.push(self.resolve_dependency(raw, spec, lookup)?);
        }

        let mut values = raw.clone();
        insert(&mut values, "STORAGE_DIR", path_value(&paths.storage_dir));
        insert(&mut values, "JOB_SOURCE_DIR", path_value(&paths.job_source_dir));
        insert(&mut values, "JOB_LOG_DIR", path_value(&paths.log_dir));
        insert(&mut values, "JOB_WORK_DIR", Value::from(layout::JOB_WORK_DIR));
        insert(&mut values, "JOB_OUTPUT_ID", Value::from(layout::JOB_OUTPUT_ID));
        insert(&mut values, "JOB_TOKEN", Value::from(token.as_str()));
        insert(&mut values, "SINGULARITY_IMAGE", path_value(&image.source));
        insert(&mut values, "JOB_IMAGE_NAME", path_value(&image.destination));
        insert(&mut values, "STORE_IMAGE", Value::Bool(image.store));
        insert(&mut values, "SLURM_TIME", Value::from(scheduling.time.as_str()));
        insert(&mut values, "SLURM_WORK_DIR", Value::from(scheduling.work_dir.as_str()));
        for dep in &resolved {
            insert(&mut values, &dep.name, path_value(&dep.source));
        }

        debug!(
            storage_dir = %paths.storage_dir.display(),
            image = %image.destination.display(),
            dependencies = resolved.len(),
            "Resolved job configuration"
        );

        Ok(JobConfig::new(token.clone(), values, paths, image, scheduling, resolved))
    }

    fn resolve_scheduling(&self, raw: &Mapping) -> Result<SchedulingParams, AppError> {
        let partition = config_value::required_string(raw, "SLURM_PARTITION")?;
        let cpus = config_value::required_positive_int(raw, "SLURM_CPU")?;
        let mem = config_value::required_positive_number(raw, "SLURM_MEM")?;
        let num_jobs = config_value::required_positive_int(raw, "SLURM_NUM_JOBS")?;
        let time = wall_time(raw)?;

        let work_dir = config_value::required_string(raw, "SLURM_WORK_DIR")?;
        let work_dir_mount = work_dir_mount(&work_dir, |name| std::env::var(name).ok())?;

        Ok(SchedulingParams {
            partition,
            cpus,
            mem_per_cpu_gb: mem_per_cpu_gb(mem, cpus),
            time,
            num_jobs,
            work_dir,
            work_dir_mount,
            gpu: config_value::optional_string(raw, "SLURM_GPU")?,
            exclude: config_value::optional_string(raw, "SLURM_EXCLUDE")?,
            nodelist: config_value::optional_string(raw, "SLURM_NODELIST")?,
        })
    }

    fn resolve_storage(&self, raw: &Mapping, token: &UniqueToken) -> Result<JobPaths, AppError> {
        let root = self.host_path(raw, "STORAGE_DIR")?;
        if !self.fs.is_dir(&root) {
            return Err(AppError::dependency_not_found("STORAGE_DIR", root));
        }

        let storage_dir = layout::storage_dir(&root, token);
        if self.fs.exists(&storage_dir) {
            return Err(AppError::StorageConflict(storage_dir));
        }
        Ok(JobPaths::new(storage_dir))
    }

    fn resolve_image(
        &self,
        raw: &Mapping,
        paths: &JobPaths,
        token: &UniqueToken,
    ) -> Result<ContainerImage, AppError> {
        let configured = self.host_path(raw, "SINGULARITY_IMAGE")?;
        if !self.fs.is_file(&configured) {
            return Err(AppError::dependency_not_found("SINGULARITY_IMAGE", configured));
        }
        let source = self.fs.canonicalize(&configured)?;

        let store = config_value::optional_bool(raw, "STORE_IMAGE", true)?;
        let destination =
            if store { layout::stored_image(&paths.storage_dir, token) } else { source.clone() };

        Ok(ContainerImage { source, destination, store })
    }

    fn resolve_dependency(
        &self,
        raw: &Mapping,
        spec: &DependencySpec,
        lookup: DependencyLookup,
    ) -> Result<FileDependency, AppError> {
        let path = match lookup {
            DependencyLookup::Use(path) => self.absolute(Path::new(&env_vars::expand(&path)?))?,
            DependencyLookup::Search(name) => {
                let repository =
                    config_value::optional_string(raw, REPOSITORY_KEY)?.ok_or_else(|| {
                        AppError::config_error(format!(
                            "To search for {} ({}), {} must be set",
                            spec.name,
                            spec.search_key(),
                            REPOSITORY_KEY
                        ))
                    })?;
                let repository = self.absolute(Path::new(&env_vars::expand(&repository)?))?;
                spec.search_path(&name, &repository)
            }
        };

        if !self.fs.is_file(&path) {
            return Err(AppError::dependency_not_found(spec.name.as_str(), path));
        }
        debug!(dependency = %spec.name, path = %path.display(), "Resolved dependency");
        FileDependency::new(spec.name.as_str(), path)
    }

    /// Required host path key: env-expanded and made absolute.
    fn host_path(&self, raw: &Mapping, key: &str) -> Result<PathBuf, AppError> {
        let value = config_value::required_string(raw, key)?;
        self.absolute(Path::new(&env_vars::expand(&value)?))
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf, AppError> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.fs.current_dir()?.join(path))
        }
    }
}

/// Whole gigabytes per CPU, halves rounded to even, at least 1.
fn mem_per_cpu_gb(mem: f64, cpus: u64) -> u64 {
    ((mem / cpus as f64).round_ties_even() as u64).max(1)
}

/// Bind entry for `SLURM_WORK_DIR`.
///
/// The value reaches `submit.sh` verbatim. A leading `$VAR` is bound as that
/// unexpanded token so node-local scratch (`$LSCRATCH`, `$TMPDIR`) works; when
/// the host can expand it, the result must still be absolute.
fn work_dir_mount<F>(raw: &str, lookup: F) -> Result<WorkDirMount, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    if Path::new(raw).is_absolute() {
        return Ok(WorkDirMount::Host(PathBuf::from(raw)));
    }
    if raw.starts_with('$') {
        if let Ok(expanded) = env_vars::expand_with(raw, lookup) {
            if !Path::new(&expanded).is_absolute() {
                return Err(AppError::config_error(format!(
                    "SLURM_WORK_DIR must be an absolute path (got {} = {})",
                    raw, expanded
                )));
            }
        }
        let token = raw.split('/').next().unwrap_or(raw);
        return Ok(WorkDirMount::NodeVariable(token.to_string()));
    }
    Err(AppError::config_error(format!(
        "SLURM_WORK_DIR must be an absolute path or start with an environment variable (got {})",
        raw
    )))
}

/// `SLURM_TIME`: seconds become `HH:MM:SS`; strings pass through.
fn wall_time(raw: &Mapping) -> Result<String, AppError> {
    match raw.get("SLURM_TIME") {
        None | Some(Value::Null) => {
            Err(AppError::config_error("SLURM_TIME key is missing in the configuration"))
        }
        Some(Value::Number(n)) => n.as_u64().map(format_wall_time).ok_or_else(|| {
            AppError::config_error(format!(
                "SLURM_TIME must be a whole number of seconds (got {})",
                n
            ))
        }),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(_) => Err(AppError::config_error(
            "SLURM_TIME must be seconds or a HH:MM:SS string",
        )),
    }
}

fn insert(values: &mut Mapping, key: &str, value: Value) {
    values.insert(Value::String(key.to_string()), value);
}
