//! Shared testing harness for `simjob` integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const LARNDSIM_DEPENDENCIES: [(&str, &str); 5] = [
    ("GEOMETRY", "nd_hall.gdml"),
    ("MPVMPR", "mpvmpr.cfg"),
    ("PIXEL_LAYOUT", "layout.yaml"),
    ("DET_PROPERTIES", "module0.yaml"),
    ("RESPONSE", "response_44.npy"),
];

/// Isolated host: a storage root, a container image, and input files.
pub(crate) struct TestContext {
    root: TempDir,
}

impl TestContext {
    /// Create a new isolated environment with an empty storage root and an image.
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        fs::create_dir_all(root.path().join("storage")).expect("Failed to create storage root");
        fs::create_dir_all(root.path().join("inputs")).expect("Failed to create inputs dir");
        fs::write(root.path().join("image.sif"), "sif").expect("Failed to write image");
        Self { root }
    }

    pub(crate) fn root(&self) -> &Path {
        self.root.path()
    }

    pub(crate) fn storage_root(&self) -> PathBuf {
        self.root.path().join("storage")
    }

    /// Directories created under the storage root, sorted.
    pub(crate) fn storage_entries(&self) -> Vec<PathBuf> {
        let mut entries: Vec<PathBuf> = fs::read_dir(self.storage_root())
            .expect("Failed to read storage root")
            .map(|entry| entry.expect("Failed to read storage entry").path())
            .collect();
        entries.sort();
        entries
    }

    /// Write a file relative to the root and return its absolute path.
    pub(crate) fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Write `count` larnd-sim outputs and return their glob pattern.
    pub(crate) fn write_inputs(&self, count: usize) -> String {
        for i in 0..count {
            self.write_file(&format!("inputs/larndsim_{i}.h5"), "h5");
        }
        self.root.path().join("inputs/larndsim_*.h5").display().to_string()
    }

    /// Keys shared by every pipeline.
    pub(crate) fn common_config(&self, num_jobs: usize) -> String {
        format!(
            "STORAGE_DIR: {}\n\
             SINGULARITY_IMAGE: {}\n\
             SLURM_PARTITION: ampere\n\
             SLURM_CPU: 4\n\
             SLURM_MEM: 16\n\
             SLURM_TIME: 7200\n\
             SLURM_NUM_JOBS: {}\n\
             SLURM_WORK_DIR: /tmp/simjob-work\n",
            self.storage_root().display(),
            self.root.path().join("image.sif").display(),
            num_jobs
        )
    }

    /// larnd2supera configuration over `inputs` files, asking for `num_jobs` tasks.
    pub(crate) fn larnd2supera_config(&self, inputs: usize, num_jobs: usize) -> String {
        format!(
            "PIPELINE: larnd2supera\n{}SUPERA_CONFIG: 2x2\nGLOB: {}\n",
            self.common_config(num_jobs),
            self.write_inputs(inputs)
        )
    }

    /// larndsim configuration with every dependency given through `USE_*`.
    pub(crate) fn larndsim_config(&self) -> String {
        let mut config = format!(
            "PIPELINE: larndsim\n{}NUM_EVENTS: 10\nLARNDSIM_SCRIPT: simulate_pixels.py\n",
            self.common_config(1)
        );
        for (name, file) in LARNDSIM_DEPENDENCIES {
            let path = self.write_file(&format!("deps/{}", file), name);
            config.push_str(&format!("USE_{}: {}\n", name, path.display()));
        }
        config
    }

    /// Write a configuration document and return its path.
    pub(crate) fn write_config(&self, name: &str, content: &str) -> PathBuf {
        self.write_file(name, content)
    }

    /// Build a command for invoking the compiled `simjob` binary inside the root.
    pub(crate) fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("simjob").expect("Failed to locate simjob binary");
        cmd.current_dir(self.root.path())
            .env("SIMJOB_SHARE_DIR", self.root.path().join("share"))
            .env_remove("RUST_LOG");
        cmd
    }
}
