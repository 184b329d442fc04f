//! Drives the plan/apply pipeline end-to-end against a stub terraform
//! binary and a file-backed SQLite database.

use indexmap::IndexMap;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;
use terradmin_node::error::AppError;
use terradmin_node::models::RunStatus;
use terradmin_node::repository::{RunRepository, TemplateRepository, establish_connection};
use terradmin_node::services::ProvisionService;
use terradmin_node::terraform::TerraformCli;

/// Stub that behaves like a cooperative terraform: plan drops the plan
/// artifact in the working directory, apply refuses to run without it.
const STUB_OK: &str = r##"#!/bin/sh
case "$1" in
  init)
    echo "Initializing the backend..."
    ;;
  plan)
    echo "Plan: 1 to add, 0 to change, 0 to destroy."
    : > apply.tfplan
    ;;
  show)
    echo "# azurerm_resource_group.example will be created"
    ;;
  apply)
    if [ ! -f apply.tfplan ]; then
      echo "Error: Saved plan file not found" >&2
      exit 1
    fi
    echo "Apply complete! Resources: 1 added, 0 changed, 0 destroyed."
    ;;
esac
exit 0
"##;

/// Same stub, but plan never writes the artifact.
const STUB_NO_ARTIFACT: &str = r##"#!/bin/sh
case "$1" in
  init)
    echo "Initializing the backend..."
    ;;
  plan)
    echo "Plan: 1 to add, 0 to change, 0 to destroy."
    ;;
  show)
    echo "# plan"
    ;;
  apply)
    if [ ! -f apply.tfplan ]; then
      echo "Error: Saved plan file not found" >&2
      exit 1
    fi
    ;;
esac
exit 0
"##;

const STUB_INIT_FAILS: &str = r#"#!/bin/sh
if [ "$1" = "init" ]; then
  echo "Error: Failed to install provider" >&2
  exit 1
fi
exit 0
"#;

struct Harness {
    service: ProvisionService,
    runs: RunRepository,
    root: TempDir,
}

impl Harness {
    fn run_dir(&self, id: i64) -> std::path::PathBuf {
        self.root.path().join("terraform").join(id.to_string())
    }
}

async fn harness(stub: &str) -> Harness {
    let root = TempDir::new().unwrap();
    let db_path = root.path().join("test.db");
    let pool = establish_connection(&format!("sqlite:{}", db_path.display()))
        .await
        .unwrap();

    let stub_path = root.path().join("terraform-stub");
    std::fs::write(&stub_path, stub).unwrap();
    let mut perms = std::fs::metadata(&stub_path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&stub_path, perms).unwrap();

    let service = ProvisionService::new(
        RunRepository::new(pool.clone()),
        TemplateRepository::new(pool.clone()),
        TerraformCli::new(Some(stub_path)),
        root.path().join("terraform"),
    );

    Harness {
        service,
        runs: RunRepository::new(pool),
        root,
    }
}

fn rg_variables() -> IndexMap<String, String> {
    let mut variables = IndexMap::new();
    variables.insert("resource_group_name".to_string(), "rg-test".to_string());
    variables.insert("location".to_string(), "eastus".to_string());
    variables
}

#[tokio::test]
async fn successful_plan_reaches_success_with_ordered_log() {
    let h = harness(STUB_OK).await;

    let outcome = h
        .service
        .plan("resource-group", None, &rg_variables())
        .await
        .unwrap();

    let run = h.runs.get(outcome.run_id).await.unwrap();
    assert_eq!(run.status, RunStatus::Success);
    assert!(run.error_message.is_none());

    let output = run.output.unwrap();
    let init_at = output.find("=== TERRAFORM INIT ===").unwrap();
    let plan_at = output.find("=== TERRAFORM PLAN ===").unwrap();
    assert!(init_at < plan_at, "init section must precede plan section");
    assert!(!output.contains("=== ERROR ==="));
}

#[tokio::test]
async fn plan_materializes_working_directory() {
    let h = harness(STUB_OK).await;

    let outcome = h
        .service
        .plan("resource-group", None, &rg_variables())
        .await
        .unwrap();

    let dir = h.run_dir(outcome.run_id);
    assert!(dir.join("main.tf").is_file());
    assert!(dir.join("variables.tf").is_file());
    assert!(dir.join("apply.tfplan").is_file());
    assert!(dir.join("plan.txt").is_file());

    let tfvars = std::fs::read_to_string(dir.join("terraform.tfvars")).unwrap();
    let lines: Vec<&str> = tfvars.lines().collect();
    assert_eq!(
        lines,
        [
            "resource_group_name = \"rg-test\"",
            "location = \"eastus\""
        ]
    );
}

#[tokio::test]
async fn failed_init_marks_run_failed_with_error_section() {
    let h = harness(STUB_INIT_FAILS).await;

    let err = h
        .service
        .plan("resource-group", None, &rg_variables())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Terraform(_)));

    let run = h.runs.list().await.unwrap().pop().unwrap();
    assert_eq!(run.status, RunStatus::Failed);
    assert!(run.output.unwrap().contains("=== ERROR ==="));

    let message = run.error_message.unwrap();
    assert!(message.contains("Failed to install provider"));
}

#[tokio::test]
async fn empty_kind_is_rejected_without_creating_a_run() {
    let h = harness(STUB_OK).await;

    let err = h.service.plan("  ", None, &rg_variables()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(h.runs.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn apply_appends_output_and_preserves_plan_log() {
    let h = harness(STUB_OK).await;

    let outcome = h
        .service
        .plan("resource-group", None, &rg_variables())
        .await
        .unwrap();
    let plan_log = h.runs.get(outcome.run_id).await.unwrap().output.unwrap();

    h.service.apply(outcome.run_id).await.unwrap();

    let run = h.runs.get(outcome.run_id).await.unwrap();
    assert_eq!(run.status, RunStatus::Applied);

    let output = run.output.unwrap();
    assert!(
        output.starts_with(&plan_log),
        "apply must append after the existing log"
    );
    assert!(output.contains("=== TERRAFORM APPLY ==="));
    assert!(output.contains("Apply complete!"));
}

#[tokio::test]
async fn apply_without_plan_artifact_fails_the_run() {
    let h = harness(STUB_NO_ARTIFACT).await;

    let outcome = h
        .service
        .plan("resource-group", None, &rg_variables())
        .await
        .unwrap();

    let err = h.service.apply(outcome.run_id).await.unwrap_err();
    assert!(matches!(err, AppError::Terraform(_)));

    let run = h.runs.get(outcome.run_id).await.unwrap();
    assert_eq!(run.status, RunStatus::ApplyFailed);
    assert!(run.output.unwrap().contains("=== ERROR ==="));

    let message = run.error_message.unwrap();
    assert!(!message.is_empty());
    assert!(message.contains("Saved plan file not found"));
}

#[tokio::test]
async fn apply_is_rejected_before_a_successful_plan() {
    let h = harness(STUB_OK).await;

    let run = h.runs.create("resource-group", "{}").await.unwrap();
    let err = h.service.apply(run.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    let run = h.runs.get(run.id).await.unwrap();
    assert_eq!(run.status, RunStatus::Pending);
}

#[tokio::test]
async fn applied_run_cannot_be_applied_again() {
    let h = harness(STUB_OK).await;

    let outcome = h
        .service
        .plan("resource-group", None, &rg_variables())
        .await
        .unwrap();
    h.service.apply(outcome.run_id).await.unwrap();

    let err = h.service.apply(outcome.run_id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    let run = h.runs.get(outcome.run_id).await.unwrap();
    assert_eq!(run.status, RunStatus::Applied);
}

#[tokio::test]
async fn applying_an_unknown_run_is_not_found() {
    let h = harness(STUB_OK).await;

    let err = h.service.apply(4242).await.unwrap_err();
    assert!(matches!(err, AppError::RunNotFound(4242)));
}

#[tokio::test]
async fn plan_text_is_served_after_a_successful_plan() {
    let h = harness(STUB_OK).await;

    let outcome = h
        .service
        .plan("resource-group", None, &rg_variables())
        .await
        .unwrap();

    let content = h.service.plan_text(outcome.run_id).await.unwrap();
    assert!(content.contains("azurerm_resource_group"));
}

#[tokio::test]
async fn stored_template_body_is_used_over_the_fallback() {
    let h = harness(STUB_OK).await;

    let templates = TemplateRepository::new(
        establish_connection(&format!(
            "sqlite:{}",
            h.root.path().join("test.db").display()
        ))
        .await
        .unwrap(),
    );
    templates
        .upsert(
            "resource-group",
            None,
            "Custom RG",
            None,
            "# custom body",
            "variable \"resource_group_name\" {}\nvariable \"location\" {}",
        )
        .await
        .unwrap();

    let outcome = h
        .service
        .plan("resource-group", None, &rg_variables())
        .await
        .unwrap();

    let body = std::fs::read_to_string(h.run_dir(outcome.run_id).join("main.tf")).unwrap();
    assert_eq!(body, "# custom body");
}
