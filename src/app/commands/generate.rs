//! Job scaffolding: resolve, validate, then materialize the job tree.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_yaml::Mapping;
use tracing::{debug, error, info};

use crate::app::config::ConfigResolver;
use crate::app::services::{ScaffoldTransaction, ScriptRenderer};
use crate::domain::dependency::basename;
use crate::domain::{
    AppError, BindPathCollector, BindPathSet, JobConfig, UniqueToken, WorkDirMount, layout,
};
use crate::pipelines::{Pipeline, PipelineContribution};
use crate::ports::JobFilesystem;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldSummary {
    pub pipeline: &'static str,
    pub storage_dir: PathBuf,
    pub job_source_dir: PathBuf,
    pub log_dir: PathBuf,
    pub submit_script: PathBuf,
    /// Basenames of files copied or generated into job-source.
    pub files: Vec<String>,
}

/// One file to place into job-source.
enum Placement<'c> {
    Copy(&'c Path),
    Generate(&'c str),
}

/// Run the full scaffolding sequence.
///
/// Everything up to the first directory creation is side-effect free. After
/// that, any failure removes what this call created and returns the
/// original error.
pub fn execute(
    raw: &Mapping,
    pipeline: &dyn Pipeline,
    token: &UniqueToken,
    fs: &dyn JobFilesystem,
) -> Result<ScaffoldSummary, AppError> {
    let mut config =
        ConfigResolver::new(fs).resolve(raw, &pipeline.dependencies(), token)?;

    let contribution = pipeline.validate_config(&config, fs)?;
    for (key, value) in &contribution.config_updates {
        config.set(key.clone(), value.clone());
    }
    debug!(
        pipeline = pipeline.name(),
        copy_files = contribution.copy_files.len(),
        generated_files = contribution.generated_files.len(),
        "Pipeline validated"
    );

    let bind_paths = collect_bind_paths(&config, &contribution)?;
    let placements = plan_placements(&config, &contribution)?;
    let renderer = ScriptRenderer::new()?;

    let mut tx = ScaffoldTransaction::new(fs);
    match materialize(&mut tx, fs, &config, pipeline, &renderer, &bind_paths, &placements) {
        Ok(files) => {
            tx.commit();
            info!(storage_dir = %config.paths.storage_dir.display(), "Job scaffold complete");
            Ok(ScaffoldSummary {
                pipeline: pipeline.name(),
                storage_dir: config.paths.storage_dir.clone(),
                job_source_dir: config.paths.job_source_dir.clone(),
                log_dir: config.paths.log_dir.clone(),
                submit_script: config.paths.job_source_dir.join(layout::SUBMIT_SCRIPT),
                files,
            })
        }
        Err(err) => {
            error!(error = %err, "Scaffolding failed; rolling back");
            let failures = tx.rollback();
            if !failures.is_empty() {
                error!(count = failures.len(), "Rollback left objects behind");
            }
            Err(err)
        }
    }
}

fn materialize(
    tx: &mut ScaffoldTransaction<'_>,
    fs: &dyn JobFilesystem,
    config: &JobConfig,
    pipeline: &dyn Pipeline,
    renderer: &ScriptRenderer,
    bind_paths: &BindPathSet,
    placements: &[(String, Placement<'_>)],
) -> Result<Vec<String>, AppError> {
    let paths = &config.paths;
    tx.create_dir(&paths.storage_dir)?;
    tx.create_dir(&paths.job_source_dir)?;
    tx.create_dir(&paths.log_dir)?;
    info!(storage_dir = %paths.storage_dir.display(), "Created job directory tree");

    if config.image.store {
        let bytes = tx.copy_file(&config.image.source, &config.image.destination)?;
        info!(image = %config.image.destination.display(), bytes, "Stored container image");
    }

    let submit = renderer.render_submission_script(config, bind_paths)?;
    write_executable(tx, fs, &paths.job_source_dir.join(&submit.file_name), &submit.content)?;

    let body = pipeline.build_run_script_body(config)?;
    let run = renderer.render_run_script(config, &body)?;
    write_executable(tx, fs, &paths.job_source_dir.join(&run.file_name), &run.content)?;

    let mut files = Vec::with_capacity(placements.len());
    for (file_name, placement) in placements {
        let target = paths.job_source_dir.join(file_name);
        match placement {
            Placement::Copy(source) => {
                tx.copy_file(source, &target)?;
                info!(source = %source.display(), file = %file_name, "Copied dependency");
            }
            Placement::Generate(content) => {
                tx.write_file(&target, content)?;
                debug!(file = %file_name, "Wrote generated file");
            }
        }
        files.push(file_name.clone());
    }

    let record = format!(
        "# Resolved by simjob {} ({} pipeline) at {}\n{}",
        env!("CARGO_PKG_VERSION"),
        pipeline.name(),
        Local::now().to_rfc3339(),
        config.to_yaml()?
    );
    tx.write_file(&paths.job_source_dir.join(layout::CONFIG_RECORD), &record)?;

    Ok(files)
}

fn write_executable(
    tx: &mut ScaffoldTransaction<'_>,
    fs: &dyn JobFilesystem,
    path: &Path,
    content: &str,
) -> Result<(), AppError> {
    tx.write_file(path, content)?;
    fs.set_executable(path)?;
    debug!(script = %path.display(), "Wrote script");
    Ok(())
}

/// Storage, work dir, image, and job-source, plus whatever the pipeline adds.
fn collect_bind_paths(
    config: &JobConfig,
    contribution: &PipelineContribution,
) -> Result<BindPathSet, AppError> {
    let mut collector = BindPathCollector::new();
    collector.add(&config.paths.storage_dir)?;
    match &config.scheduling.work_dir_mount {
        WorkDirMount::Host(path) => collector.add(path)?,
        WorkDirMount::NodeVariable(token) => collector.add_node_variable(token)?,
    }
    collector.add(&config.image.destination)?;
    collector.add(&config.paths.job_source_dir)?;
    collector.extend(&contribution.bind_paths)?;

    let set = collector.minimize();
    debug!(bind_paths = %set.joined(), "Minimized bind paths");
    Ok(set)
}

/// Core dependencies, pipeline copies, then generated files, keyed by basename.
fn plan_placements<'c>(
    config: &'c JobConfig,
    contribution: &'c PipelineContribution,
) -> Result<Vec<(String, Placement<'c>)>, AppError> {
    let mut placements = Vec::new();
    for dep in &config.dependencies {
        placements.push((dep.file_name.clone(), Placement::Copy(dep.source.as_path())));
    }
    for source in &contribution.copy_files {
        placements.push((basename(source)?, Placement::Copy(source.as_path())));
    }
    for generated in &contribution.generated_files {
        placements.push((generated.file_name.clone(), Placement::Generate(&generated.content)));
    }

    let mut taken: BTreeSet<&str> =
        [layout::SUBMIT_SCRIPT, layout::RUN_SCRIPT, layout::CONFIG_RECORD].into_iter().collect();
    for (file_name, _) in &placements {
        if !taken.insert(file_name.as_str()) {
            return Err(AppError::config_error(format!(
                "Two job files would share the name '{}' in the job-source directory",
                file_name
            )));
        }
    }
    Ok(placements)
}
