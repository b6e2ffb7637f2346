use std::path::PathBuf;

use serde_yaml::{Mapping, Value};

use crate::domain::job_config::path_value;
use crate::domain::{
    ContainerImage, FileDependency, JobConfig, JobPaths, SchedulingParams, UniqueToken, WorkDirMount, layout,
};

/// Builder for an already-resolved `JobConfig`, bypassing filesystem probes.
///
/// Paths live under `/storage` and `/images`; nothing is touched on disk.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct JobConfigBuilder {
    token: String,
    scheduling: SchedulingParams,
    store_image: bool,
    dependencies: Vec<FileDependency>,
    extra: Vec<(String, Value)>,
}

#[allow(dead_code)]
impl JobConfigBuilder {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            scheduling: SchedulingParams {
                partition: "ampere".to_string(),
                cpus: 4,
                mem_per_cpu_gb: 2,
                time: "01:00:00".to_string(),
                num_jobs: 1,
                work_dir: "/scratch/work".to_string(),
                work_dir_mount: WorkDirMount::Host(PathBuf::from("/scratch/work")),
                gpu: None,
                exclude: None,
                nodelist: None,
            },
            store_image: true,
            dependencies: Vec::new(),
            extra: Vec::new(),
        }
    }

    pub fn gpu(mut self, gpu: &str) -> Self {
        self.scheduling.gpu = Some(gpu.to_string());
        self
    }

    pub fn exclude(mut self, nodes: &str) -> Self {
        self.scheduling.exclude = Some(nodes.to_string());
        self
    }

    pub fn nodelist(mut self, nodes: &str) -> Self {
        self.scheduling.nodelist = Some(nodes.to_string());
        self
    }

    /// Work directory under a variable only the compute node defines, e.g. `$LSCRATCH/work`.
    pub fn node_work_dir(mut self, raw: &str) -> Self {
        let token = raw.split('/').next().unwrap_or(raw);
        self.scheduling.work_dir = raw.to_string();
        self.scheduling.work_dir_mount = WorkDirMount::NodeVariable(token.to_string());
        self
    }

    pub fn num_jobs(mut self, num_jobs: u64) -> Self {
        self.scheduling.num_jobs = num_jobs;
        self
    }

    pub fn store_image(mut self, store: bool) -> Self {
        self.store_image = store;
        self
    }

    pub fn dependency(mut self, name: &str, source: &str) -> Self {
        self.dependencies.push(FileDependency::new(name, PathBuf::from(source)).unwrap());
        self
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.push((key.to_string(), value.into()));
        self
    }

    pub fn build(self) -> JobConfig {
        let token = UniqueToken::new(self.token).unwrap();
        let paths = JobPaths::new(layout::storage_dir(&PathBuf::from("/storage"), &token));
        let source = PathBuf::from("/images/sim.sif");
        let destination =
            if self.store_image { layout::stored_image(&paths.storage_dir, &token) } else { source.clone() };
        let image = ContainerImage { source, destination, store: self.store_image };

        let mut values = Mapping::new();
        for (key, value) in self.extra {
            values.insert(Value::String(key), value);
        }
        values.insert("STORAGE_DIR".into(), path_value(&paths.storage_dir));
        values.insert("JOB_SOURCE_DIR".into(), path_value(&paths.job_source_dir));
        values.insert("SLURM_NUM_JOBS".into(), self.scheduling.num_jobs.into());
        for dep in &self.dependencies {
            values.insert(Value::String(dep.name.clone()), path_value(&dep.source));
        }

        JobConfig::new(token, values, paths, image, self.scheduling, self.dependencies)
    }
}
