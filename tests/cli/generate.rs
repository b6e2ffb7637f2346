use crate::harness::TestContext;
use predicates::prelude::*;
use std::fs;

#[test]
fn larnd2supera_job_is_scaffolded() {
    let ctx = TestContext::new();
    let config = ctx.write_config("job.yaml", &ctx.larnd2supera_config(2, 2));

    ctx.cli()
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Created larnd2supera job source at"))
        .stdout(predicate::str::contains("sbatch "));

    let entries = ctx.storage_entries();
    assert_eq!(entries.len(), 1);
    let storage = &entries[0];
    let name = storage.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("production_"));
    let token = name.trim_start_matches("production_");

    let source = storage.join("job_source");
    let flist = fs::read_to_string(source.join("flist.txt")).unwrap();
    assert_eq!(flist.lines().count(), 2);
    assert!(storage.join(format!("image_{token}.sif")).is_file());

    let submit = fs::read_to_string(source.join("submit.sh")).unwrap();
    assert!(submit.contains(&format!("#SBATCH --job-name=simjob-{token}\n")));
    assert!(submit.contains("#SBATCH --array=1-2\n"));
    assert!(submit.contains("#SBATCH --time=02:00:00\n"));
    assert!(submit.contains("#SBATCH --mem-per-cpu=4G\n"));
    assert!(!submit.contains("--nodelist"));
}

#[test]
fn larndsim_job_copies_every_dependency() {
    let ctx = TestContext::new();
    let config = ctx.write_config("job.yaml", &ctx.larndsim_config());

    ctx.cli().arg(&config).assert().success();

    let entries = ctx.storage_entries();
    assert_eq!(entries.len(), 1);
    let source = entries[0].join("job_source");
    for file in [
        "nd_hall.gdml",
        "mpvmpr.cfg",
        "layout.yaml",
        "module0.yaml",
        "response_44.npy",
        "g4.mac",
        "submit.sh",
        "run.sh",
        "source.yaml",
    ] {
        assert!(source.join(file).is_file(), "{file} should be in job_source");
    }

    let run = fs::read_to_string(source.join("run.sh")).unwrap();
    assert!(run.contains("edep-sim -g nd_hall.gdml -e 10"));
    assert!(run.contains("rm response_44.npy\n"));
}

#[test]
fn nodelist_directive_uses_its_own_value() {
    let ctx = TestContext::new();
    let yaml = format!(
        "{}SLURM_NODELIST: node07\nSLURM_EXCLUDE: node01\n",
        ctx.larnd2supera_config(1, 1)
    );
    let config = ctx.write_config("job.yaml", &yaml);

    ctx.cli().arg(&config).assert().success();

    let submit =
        fs::read_to_string(ctx.storage_entries()[0].join("job_source/submit.sh")).unwrap();
    assert!(submit.contains("#SBATCH --nodelist=\"node07\"\n"));
    assert!(submit.contains("#SBATCH --exclude=\"node01\"\n"));
}

#[test]
fn glob_count_mismatch_fails_without_residue() {
    let ctx = TestContext::new();
    let config = ctx.write_config("job.yaml", &ctx.larnd2supera_config(3, 4));

    ctx.cli()
        .arg(&config)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("matched 3 files"))
        .stderr(predicate::str::contains("SLURM_NUM_JOBS is 4"));

    assert!(ctx.storage_entries().is_empty());
}

#[test]
fn unknown_pipeline_is_rejected() {
    let ctx = TestContext::new();
    let yaml = ctx.larnd2supera_config(1, 1).replace("PIPELINE: larnd2supera", "PIPELINE: genie");
    let config = ctx.write_config("job.yaml", &yaml);

    ctx.cli()
        .arg(&config)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown PIPELINE 'genie'"));
}

#[test]
fn verbose_flag_logs_scaffolding_steps() {
    let ctx = TestContext::new();
    let config = ctx.write_config("job.yaml", &ctx.larnd2supera_config(1, 1));

    ctx.cli()
        .arg("--verbose")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("Minimized bind paths"));
}
