// CLI surface tests for the ado2gh binary

use assert_cmd::Command;
use predicates::prelude::*;

fn ado2gh() -> Command {
    let mut cmd = Command::cargo_bin("ado2gh").unwrap();
    // Run in an empty directory so no ado2gh.toml or .env is picked up
    cmd.current_dir(tempfile::tempdir().unwrap().keep())
        .env_remove("ADO_PAT")
        .env_remove("GH_PAT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_both_subcommands() {
    ado2gh()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrate-branch-policies"))
        .stdout(predicate::str::contains("migrate-pull-requests"));
}

#[test]
fn test_pull_request_help_shows_status_toggles() {
    ado2gh()
        .args(["migrate-pull-requests", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--include-abandoned"))
        .stdout(predicate::str::contains("--include-completed"))
        .stdout(predicate::str::contains("--include-active"))
        .stdout(predicate::str::contains("--skip-comments"))
        .stdout(predicate::str::contains("--label"));
}

#[test]
fn test_branch_policy_help_shows_connection_flags() {
    ado2gh()
        .args(["migrate-branch-policies", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--ado-team-project"))
        .stdout(predicate::str::contains("--target-api-url"))
        .stdout(predicate::str::contains("--github-pat"));
}

#[test]
fn test_missing_repository_flags_is_a_usage_error() {
    ado2gh()
        .args(["migrate-branch-policies", "--ado-org", "contoso"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--ado-team-project"));
}

#[test]
fn test_missing_token_fails_with_guidance() {
    ado2gh()
        .args([
            "migrate-branch-policies",
            "--ado-org",
            "contoso",
            "--ado-team-project",
            "web",
            "--ado-repo",
            "app",
            "--github-org",
            "contoso-gh",
            "--github-repo",
            "app",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No Azure DevOps token found"))
        .stderr(predicate::str::contains("ADO_PAT"));
}
