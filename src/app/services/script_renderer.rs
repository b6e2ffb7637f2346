//! Renders the Slurm submission script and the container run script.

use minijinja::{Environment, Value, context};

use crate::adapters::assets::script_templates::script_templates;
use crate::domain::{AppError, BindPathSet, JobConfig, RenderedScript, layout};

const SUBMIT_TEMPLATE: &str = "submit.sh.j2";
const RUN_TEMPLATE: &str = "run.sh.j2";

/// Template-backed script renderer.
pub struct ScriptRenderer {
    env: Environment<'static>,
}

impl ScriptRenderer {
    pub fn new() -> Result<Self, AppError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        for template in script_templates()? {
            env.add_template(template.name, template.source).map_err(|e| {
                AppError::Template(format!(
                    "Failed to register template '{}': {}",
                    template.name, e
                ))
            })?;
        }

        Ok(Self { env })
    }

    /// Render `submit.sh`.
    ///
    /// Scheduler variables (`$SLURM_ARRAY_JOB_ID`, `$SLURM_ARRAY_TASK_ID`) are
    /// emitted literally for the compute node's shell to expand.
    pub fn render_submission_script(
        &self,
        config: &JobConfig,
        bind_paths: &BindPathSet,
    ) -> Result<RenderedScript, AppError> {
        let ctx = context! {
            token => config.token().as_str(),
            slurm => &config.scheduling,
            log_dir => config.paths.log_dir.display().to_string(),
            job_source_dir => config.paths.job_source_dir.display().to_string(),
            storage_dir => config.paths.storage_dir.display().to_string(),
            image => config.image.destination.display().to_string(),
            bind_paths => bind_paths.joined(),
            work_dir_format => layout::JOB_WORK_DIR_FORMAT,
            run_script => layout::RUN_SCRIPT,
        };
        let content = self.render(SUBMIT_TEMPLATE, &ctx)?;
        Ok(RenderedScript::new(layout::SUBMIT_SCRIPT, content))
    }

    /// Render `run.sh`: a generic preamble wrapped around a pipeline body.
    pub fn render_run_script(
        &self,
        config: &JobConfig,
        body: &str,
    ) -> Result<RenderedScript, AppError> {
        let ctx = context! {
            token => config.token().as_str(),
            output_id => config.job_output_id(),
            body => body.trim_end(),
        };
        let content = self.render(RUN_TEMPLATE, &ctx)?;
        Ok(RenderedScript::new(layout::RUN_SCRIPT, content))
    }

    fn render(&self, name: &str, ctx: &Value) -> Result<String, AppError> {
        let template = self.env.get_template(name).map_err(|e| {
            AppError::Template(format!("Failed to load template '{}': {}", name, e))
        })?;

        template
            .render(ctx)
            .map_err(|e| AppError::Template(format!("Failed to render template '{}': {}", name, e)))
    }
}
