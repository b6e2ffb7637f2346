use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::domain::dependency::basename;
use crate::domain::{AppError, GeneratedFile, JobConfig, top_level_ancestor};
use crate::pipelines::{Pipeline, PipelineContribution};
use crate::ports::JobFilesystem;

const FILE_LIST: &str = "flist.txt";

/// Converts one larnd-sim output per array task into LArCV.
///
/// Task `i` (1-based, as assigned by Slurm) reads line `i` of `flist.txt`.
#[derive(Debug, Clone, Default)]
pub struct Larnd2SuperaPipeline;

impl Larnd2SuperaPipeline {
    pub fn new() -> Self {
        Self
    }
}

impl Pipeline for Larnd2SuperaPipeline {
    fn name(&self) -> &'static str {
        "larnd2supera"
    }

    fn validate_config(
        &self,
        config: &JobConfig,
        fs: &dyn JobFilesystem,
    ) -> Result<PipelineContribution, AppError> {
        let mut contribution = PipelineContribution::default();

        let supera_config = config.require_string("SUPERA_CONFIG")?;
        if is_path_like(&supera_config) {
            let path = absolute(fs, Path::new(&supera_config))?;
            if !fs.is_file(&path) {
                return Err(AppError::dependency_not_found("SUPERA_CONFIG", path));
            }
            contribution
                .config_updates
                .push(("SUPERA_CONFIG".to_string(), Value::from(basename(&path)?)));
            contribution.copy_files.push(path);
        }

        let pattern = config.require_string("GLOB")?;
        let pattern = if Path::new(&pattern).is_absolute() {
            pattern
        } else {
            fs.current_dir()?.join(&pattern).display().to_string()
        };
        let inputs = fs.glob(&pattern)?;
        if inputs.is_empty() {
            return Err(AppError::config_error(format!("GLOB {} matched no files", pattern)));
        }

        let expected = config.scheduling.num_jobs;
        if inputs.len() as u64 != expected {
            return Err(AppError::config_error(format!(
                "GLOB {} matched {} files but SLURM_NUM_JOBS is {} (must match)",
                pattern,
                inputs.len(),
                expected
            )));
        }

        let mut list = String::new();
        for input in &inputs {
            list.push_str(&input.display().to_string());
            list.push('\n');
            contribution.bind_paths.push(top_level_ancestor(input));
        }
        contribution.generated_files.push(GeneratedFile::new(FILE_LIST, list));

        Ok(contribution)
    }

    fn build_run_script_body(&self, config: &JobConfig) -> Result<String, AppError> {
        let supera_config = config.require_string("SUPERA_CONFIG")?;

        Ok(format!(
            r#"echo "Copying the input file"
SOURCE_FILE_NAME=$(sed -n "${{SLURM_ARRAY_TASK_ID}}p" {FILE_LIST})
INPUT_FILE_NAME=$(basename "$SOURCE_FILE_NAME")
scp "$SOURCE_FILE_NAME" "$INPUT_FILE_NAME"

date
echo "Running Supera"
run_larnd2supera.py -o ${{OUTPUT_NAME}}-larcv.root -c {supera_config} "$INPUT_FILE_NAME" &>> log_supera.txt

date
echo "Removing the input"
rm "$INPUT_FILE_NAME"
touch "$INPUT_FILE_NAME"
"#
        ))
    }
}

/// Values naming a file on disk, as opposed to a config bundled with larnd2supera.
fn is_path_like(value: &str) -> bool {
    value.contains('/') || value.ends_with(".yaml") || value.ends_with(".yml")
}

fn absolute(fs: &dyn JobFilesystem, path: &Path) -> Result<PathBuf, AppError> {
    if path.is_absolute() { Ok(path.to_path_buf()) } else { Ok(fs.current_dir()?.join(path)) }
}
