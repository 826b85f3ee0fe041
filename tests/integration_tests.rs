use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use tfgate::config::Config;
use tfgate::core::gate::TfGate;
use tfgate::formatters::output::OutputFormatter;
use tfgate::selector::{
    catalog::ModuleCatalog,
    engine::{self, SelectionError},
    gate,
    model::{FallbackPolicy, SelectionResult},
};

fn default_catalog() -> ModuleCatalog {
    ModuleCatalog::from_config(&Config::default_catalog())
}

#[test]
fn test_all_token_wins_in_any_casing() {
    let catalog = default_catalog();
    for message in [
        "deploy all",
        "Deploy ALL modules",
        "redeploy All plus iam and compute",
    ] {
        let result =
            engine::select_from_commit(&catalog, message, FallbackPolicy::Fail).unwrap();
        assert_eq!(result, SelectionResult::RunAll, "message: {message:?}");
    }
}

#[test]
fn test_named_modules_selected_in_catalog_order() {
    let catalog = default_catalog();
    let result = engine::select_from_commit(
        &catalog,
        "touch database and project configs",
        FallbackPolicy::RunAll,
    )
    .unwrap();
    assert_eq!(
        result,
        SelectionResult::Modules(vec!["project".to_string(), "database".to_string()])
    );
}

#[test]
fn test_lenient_and_strict_policies_disagree_on_empty_match() {
    let catalog = default_catalog();

    let lenient =
        engine::select_from_commit(&catalog, "chore: bump deps", FallbackPolicy::RunAll)
            .unwrap();
    assert_eq!(lenient, SelectionResult::RunAll);

    let strict = engine::select_from_commit(&catalog, "chore: bump deps", FallbackPolicy::Fail);
    assert!(matches!(
        strict,
        Err(SelectionError::NoModulesDetected { .. })
    ));
}

#[test]
fn test_strict_error_names_expected_directories() {
    let catalog = default_catalog();
    let err = engine::select_from_commit(&catalog, "chore", FallbackPolicy::Fail).unwrap_err();
    let message = err.to_string();
    for prefix in ["project/", "iam/", "compute/", "network/", "database/"] {
        assert!(message.contains(prefix), "missing {prefix} in: {message}");
    }
}

#[test]
fn test_file_diff_selects_exactly_touched_modules() {
    let catalog = default_catalog();
    let paths = vec![
        "iam/policy.tf".to_string(),
        "compute/main.tf".to_string(),
    ];
    let result = engine::select_from_files(&catalog, &paths).unwrap();
    assert_eq!(
        result,
        SelectionResult::Modules(vec!["iam".to_string(), "compute".to_string()])
    );
}

#[test]
fn test_file_diff_outside_catalog_fails() {
    let catalog = default_catalog();
    let result = engine::select_from_files(&catalog, &["README.md".to_string()]);
    assert!(matches!(
        result,
        Err(SelectionError::NoModulesDetected { .. })
    ));
}

#[test]
fn test_gate_honors_selection() {
    let catalog = default_catalog();

    let run_all = SelectionResult::RunAll;
    for module in catalog.modules() {
        assert!(gate::should_run(&module.name, &run_all));
    }

    let picked = SelectionResult::Modules(vec!["network".to_string()]);
    assert!(gate::should_run("network", &picked));
    for name in ["project", "iam", "compute", "database"] {
        assert!(!gate::should_run(name, &picked));
    }
}

#[test]
fn test_report_and_variable_output_agree() {
    let catalog = default_catalog();
    let result = SelectionResult::Modules(vec!["iam".to_string(), "database".to_string()]);

    let report = OutputFormatter::format_report("diff", &catalog, &result);
    assert_eq!(report["run_all"], false);
    assert_eq!(report["gates"]["iam"], true);
    assert_eq!(report["gates"]["compute"], false);

    let azdo = OutputFormatter::format_azdo(&result);
    assert!(azdo.contains("changedModules;isOutput=true]iam,database"));
}

// --- end-to-end detection against a real git repository ---

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

fn commit_file(dir: &Path, path: &str, message: &str) {
    let full = dir.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(&full, "resource {}\n").unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", message]);
}

fn init_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    git(temp.path(), &["init", "-q", "-b", "main"]);
    temp
}

#[tokio::test]
async fn test_commit_mode_end_to_end() {
    let repo = init_repo();
    commit_file(repo.path(), "network/vpc.tf", "deploy network and iam");

    let gate = TfGate::new(None, Some(repo.path().display().to_string())).unwrap();
    let result = gate.detect_from_commit(None, false).await.unwrap();
    assert_eq!(
        result,
        SelectionResult::Modules(vec!["iam".to_string(), "network".to_string()])
    );
}

#[tokio::test]
async fn test_diff_mode_end_to_end() {
    let repo = init_repo();
    commit_file(repo.path(), "project/main.tf", "initial layout");
    commit_file(repo.path(), "database/main.tf", "add database");

    let gate = TfGate::new(None, Some(repo.path().display().to_string())).unwrap();
    let result = gate
        .detect_from_files(Vec::new(), Some("HEAD~1"))
        .await
        .unwrap();
    assert_eq!(
        result,
        SelectionResult::Modules(vec!["database".to_string()])
    );
}

#[tokio::test]
async fn test_diff_mode_with_config_file() {
    let repo = init_repo();
    commit_file(repo.path(), "stacks/core/main.tf", "initial");
    commit_file(repo.path(), "stacks/edge/cdn.tf", "edge rollout");

    let config_path = repo.path().join("tfgate.yml");
    fs::write(
        &config_path,
        r#"
modules:
  - name: core
    path: stacks/core/*
    order: 1
  - name: edge
    path: stacks/edge/*
    order: 2
"#,
    )
    .unwrap();

    let gate = TfGate::new(
        Some(config_path.display().to_string()),
        Some(repo.path().display().to_string()),
    )
    .unwrap();
    let result = gate
        .detect_from_files(Vec::new(), Some("HEAD~1"))
        .await
        .unwrap();
    assert_eq!(result, SelectionResult::Modules(vec!["edge".to_string()]));
}

#[tokio::test]
async fn test_diff_mode_ignores_configured_prefixes_end_to_end() {
    let repo = init_repo();
    commit_file(repo.path(), "iam/policy.tf", "initial");
    commit_file(repo.path(), "docs/runbook.md", "update runbook");

    let config_path = repo.path().join("tfgate.yml");
    fs::write(
        &config_path,
        r#"
modules:
  - name: iam
    path: iam/
ignore_paths:
  - docs/
"#,
    )
    .unwrap();

    let gate = TfGate::new(
        Some(config_path.display().to_string()),
        Some(repo.path().display().to_string()),
    )
    .unwrap();
    // The only changed file is under an ignored prefix.
    let result = gate.detect_from_files(Vec::new(), Some("HEAD~1")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_explicit_file_list_bypasses_git() {
    // Repo directory is irrelevant when paths come from the caller.
    let repo = init_repo();
    let gate = TfGate::new(None, Some(repo.path().display().to_string())).unwrap();
    let result = gate
        .detect_from_files(vec!["compute/vm.tf".to_string()], None)
        .await
        .unwrap();
    assert_eq!(
        result,
        SelectionResult::Modules(vec!["compute".to_string()])
    );
}
