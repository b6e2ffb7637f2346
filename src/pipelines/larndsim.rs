use std::env;
use std::path::PathBuf;

use serde_yaml::Value;

use crate::domain::{AppError, DependencySpec, GeneratedFile, JobConfig};
use crate::pipelines::{Pipeline, PipelineContribution};
use crate::ports::JobFilesystem;

/// Overrides the directory holding bundled geometry and generator configs.
pub const SHARE_DIR_ENV: &str = "SIMJOB_SHARE_DIR";

const MACRO_FILE: &str = "g4.mac";

/// edep-sim -> dumpTree -> larnd-sim.
#[derive(Debug, Clone)]
pub struct LarndsimPipeline {
    share_dir: PathBuf,
}

impl LarndsimPipeline {
    pub fn new(share_dir: impl Into<PathBuf>) -> Self {
        Self { share_dir: share_dir.into() }
    }

    /// `$SIMJOB_SHARE_DIR`, else `<prefix>/share` for an executable in `<prefix>/bin`.
    pub fn from_env() -> Self {
        let share_dir = env::var_os(SHARE_DIR_ENV).map(PathBuf::from).unwrap_or_else(|| {
            env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().and_then(|bin| bin.parent()).map(|p| p.join("share")))
                .unwrap_or_else(|| PathBuf::from("share"))
        });
        Self::new(share_dir)
    }
}

impl Pipeline for LarndsimPipeline {
    fn name(&self) -> &'static str {
        "larndsim"
    }

    fn dependencies(&self) -> Vec<DependencySpec> {
        vec![
            DependencySpec::new("GEOMETRY", self.share_dir.join("geometry")),
            DependencySpec::new("MPVMPR", self.share_dir.join("config")),
            DependencySpec::new("PIXEL_LAYOUT", "larndsim/pixel_layouts"),
            DependencySpec::new("DET_PROPERTIES", "larndsim/detector_properties"),
            DependencySpec::new("RESPONSE", "larndsim/bin"),
        ]
    }

    fn validate_config(
        &self,
        config: &JobConfig,
        _fs: &dyn JobFilesystem,
    ) -> Result<PipelineContribution, AppError> {
        config.require_positive_int("NUM_EVENTS")?;
        config.require_string("LARNDSIM_SCRIPT")?;
        let mpv_config = config.dependency_file_name("MPVMPR")?;

        Ok(PipelineContribution {
            generated_files: vec![GeneratedFile::new(MACRO_FILE, g4_macro(mpv_config))],
            config_updates: vec![("G4_MACRO".to_string(), Value::from(MACRO_FILE))],
            ..PipelineContribution::default()
        })
    }

    fn build_run_script_body(&self, config: &JobConfig) -> Result<String, AppError> {
        let geometry = config.dependency_file_name("GEOMETRY")?;
        let pixel_layout = config.dependency_file_name("PIXEL_LAYOUT")?;
        let det_properties = config.dependency_file_name("DET_PROPERTIES")?;
        let response = config.dependency_file_name("RESPONSE")?;
        let num_events = config.require_positive_int("NUM_EVENTS")?;
        let larndsim_script = config.require_string("LARNDSIM_SCRIPT")?;

        let edepsim = format!(
            "edep-sim -g {geometry} -e {num_events} -o ${{OUTPUT_NAME}}-edepsim.root {MACRO_FILE}"
        );
        let dumptree = "dumpTree.py ${OUTPUT_NAME}-edepsim.root ${OUTPUT_NAME}-edepsim.h5".to_string();
        let larndsim = format!(
            "{larndsim_script} --pixel_layout={pixel_layout} --detector_properties={det_properties} \
             --response_file={response} --event_separator=eventID --save_memory='resource.h5' \
             --input_filename=${{OUTPUT_NAME}}-edepsim.h5 --output_filename=${{OUTPUT_NAME}}-larndsim.h5"
        );

        let mut body = String::from("nvidia-smi &> jobinfo_gpu.txt\n");
        for (label, command, log) in [
            ("edep-sim", edepsim, "log_edepsim.txt"),
            ("dumpTree", dumptree, "log_dumptree.txt"),
            ("larnd-sim", larndsim, "log_larndsim.txt"),
        ] {
            body.push_str(&format!(
                "\ndate\necho \"Running {label}\"\necho \"{command}\"\n{command} &>> {log}\n"
            ));
        }
        body.push_str(&format!("\ndate\necho \"Removing the response file\"\nrm {response}\n"));
        Ok(body)
    }
}

fn g4_macro(mpv_config: &str) -> String {
    format!(
        "/edep/hitSeparation TPCActive_shape -1 mm
/edep/hitSagitta drift 1.0 mm
/edep/hitLength drift 1.0 mm
/edep/db/set/neutronThreshold 0 MeV
/edep/db/set/lengthThreshold 0 mm
/edep/db/set/gammaThreshold 0 MeV
/edep/random/timeRandomSeed
/edep/update

/generator/kinematics/bomb/config {mpv_config}
/generator/kinematics/bomb/verbose 0
/generator/kinematics/set bomb

/generator/count/fixed/number 1
/generator/count/set fixed
/generator/add
"
    )
}
