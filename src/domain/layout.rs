//! Job directory tree layout.

use std::path::{Path, PathBuf};

use super::UniqueToken;

/// Job-source subdirectory name.
pub const JOB_SOURCE_DIR: &str = "job_source";

/// Slurm log subdirectory name.
pub const LOG_DIR: &str = "slurm_logs";

/// Submission script consumed by `sbatch`.
pub const SUBMIT_SCRIPT: &str = "submit.sh";

/// Run script executed inside the container.
pub const RUN_SCRIPT: &str = "run.sh";

/// Serialized resolved configuration.
pub const CONFIG_RECORD: &str = "source.yaml";

/// `printf` format for the per-task work directory, fed the array job and task ids.
pub const JOB_WORK_DIR_FORMAT: &str = "job_%d_%04d";

/// Per-task work directory name as seen by the compute node's shell.
pub const JOB_WORK_DIR: &str = "job_${SLURM_ARRAY_JOB_ID}_${SLURM_ARRAY_TASK_ID}";

/// Output naming stem, expanded by the shell on the compute node.
pub const JOB_OUTPUT_ID: &str = "output_${SLURM_ARRAY_JOB_ID}_${SLURM_ARRAY_TASK_ID}";

// ── Tree paths ─────────────────────────────────────────────────────────

/// `<storage_root>/production_<token>/`
pub fn storage_dir(storage_root: &Path, token: &UniqueToken) -> PathBuf {
    storage_root.join(format!("production_{}", token))
}

/// `<storage_dir>/job_source/`
pub fn job_source_dir(storage_dir: &Path) -> PathBuf {
    storage_dir.join(JOB_SOURCE_DIR)
}

/// `<storage_dir>/slurm_logs/`
pub fn log_dir(storage_dir: &Path) -> PathBuf {
    storage_dir.join(LOG_DIR)
}

/// `<storage_dir>/image_<token>.sif`
pub fn stored_image(storage_dir: &Path, token: &UniqueToken) -> PathBuf {
    storage_dir.join(format!("image_{}.sif", token))
}
