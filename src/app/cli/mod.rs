//! CLI Adapter.

use std::path::{Path, PathBuf};

use clap::Parser;
use clap::error::ErrorKind;

use crate::app::config::CONFIG_EXTENSION;
use crate::app::{api, logging};
use crate::domain::AppError;

/// Exit code for anything but exactly one configuration file.
pub const EXIT_USAGE: i32 = 1;
/// Exit code for a configuration file without the `.yaml` extension.
pub const EXIT_EXTENSION: i32 = 2;
/// Exit code for configuration or scaffolding failures.
pub const EXIT_FAILURE: i32 = 3;

#[derive(Parser)]
#[command(name = "simjob")]
#[command(version)]
#[command(
    about = "Scaffold Slurm job directories for containerized simulation pipelines",
    long_about = None
)]
struct Cli {
    /// Log resolved values and each scaffolding step
    #[arg(short, long)]
    verbose: bool,
    /// Job configuration (.yaml)
    #[arg(value_name = "CONFIG")]
    configs: Vec<PathBuf>,
}

/// Entry point for the CLI.
pub fn run() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_error_exit_code(e.kind()));
        }
    };
    logging::init(cli.verbose);

    if cli.configs.len() != 1 {
        eprintln!("Invalid number of arguments ({})", cli.configs.len());
        eprintln!("Usage: simjob [--verbose] <CONFIG.{}>", CONFIG_EXTENSION);
        std::process::exit(EXIT_USAGE);
    }

    let config = &cli.configs[0];
    if !has_config_extension(config) {
        eprintln!("The argument must be a file with the .{} extension.", CONFIG_EXTENSION);
        eprintln!("(provided: {})", config.display());
        std::process::exit(EXIT_EXTENSION);
    }

    if let Err(e) = run_generate(config) {
        eprintln!("Error: {}", e);
        std::process::exit(EXIT_FAILURE);
    }
}

fn run_generate(config: &Path) -> Result<(), AppError> {
    let summary = api::generate(config)?;
    println!("✅ Created {} job source at {}", summary.pipeline, summary.job_source_dir.display());
    println!("✅ Storage directory: {}", summary.storage_dir.display());
    println!();
    println!("Submit with:");
    println!("  sbatch {}", summary.submit_script.display());
    Ok(())
}

/// `--help` and `--version` succeed; every other parse error is a usage error.
fn parse_error_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_USAGE,
    }
}

fn has_config_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == CONFIG_EXTENSION)
}
