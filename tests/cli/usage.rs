use crate::harness::TestContext;
use predicates::prelude::*;

#[test]
fn no_arguments_exits_with_usage_code() {
    let ctx = TestContext::new();

    ctx.cli()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid number of arguments (0)"));
}

#[test]
fn two_arguments_exit_with_usage_code() {
    let ctx = TestContext::new();

    ctx.cli().args(["a.yaml", "b.yaml"]).assert().code(1);
    assert!(ctx.storage_entries().is_empty());
}

#[test]
fn wrong_extension_exits_with_code_two() {
    let ctx = TestContext::new();
    let config = ctx.write_config("job.yml", &ctx.larnd2supera_config(1, 1));

    ctx.cli()
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(".yaml extension"));
    assert!(ctx.storage_entries().is_empty());
}

#[test]
fn missing_config_file_is_a_failure() {
    let ctx = TestContext::new();

    ctx.cli()
        .arg("absent.yaml")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Error: Configuration file not found"));
}

#[test]
fn unknown_flag_exits_with_usage_code() {
    let ctx = TestContext::new();
    let config = ctx.write_config("job.yaml", &ctx.larnd2supera_config(1, 1));

    ctx.cli()
        .arg("--bogus")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bogus"));
    assert!(ctx.storage_entries().is_empty());
}

#[test]
fn help_flag_succeeds() {
    let ctx = TestContext::new();

    ctx.cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}
