use crate::error::{AppError, Result};
use crate::models::{ProvisioningRun, RunStatus};
use crate::repository::{RunRepository, TemplateRepository};
use crate::terraform::{
    MAIN_TF_FILE, PLAN_TEXT_FILE, TFVARS_FILE, TerraformCli, VARIABLES_TF_FILE, tfvars,
};
use indexmap::IndexMap;
use std::path::PathBuf;

/// Fallback bodies used when the template store has nothing for the
/// requested kind.
const DEFAULT_RG_TEMPLATE: &str = r#"# Configure the Azure provider
provider "azurerm" {
  features {}
}

# Create a Resource Group
resource "azurerm_resource_group" "example" {
  name     = var.resource_group_name
  location = var.location
}"#;

const DEFAULT_RG_VARIABLES: &str = r#"variable "resource_group_name" {
  description = "Name of the Azure Resource Group"
  type        = string
}

variable "location" {
  description = "Azure region where the resources will be created"
  type        = string
}"#;

#[derive(Debug)]
pub struct PlanOutcome {
    pub run_id: i64,
    pub output: String,
}

/// Runs the sequential plan and apply pipelines. Each step blocks the
/// calling request; failures are terminal for the run and the caller must
/// create a new run to retry.
#[derive(Clone)]
pub struct ProvisionService {
    run_repo: RunRepository,
    template_repo: TemplateRepository,
    terraform: TerraformCli,
    terraform_root: PathBuf,
}

impl ProvisionService {
    pub fn new(
        run_repo: RunRepository,
        template_repo: TemplateRepository,
        terraform: TerraformCli,
        terraform_root: PathBuf,
    ) -> Self {
        Self {
            run_repo,
            template_repo,
            terraform,
            terraform_root,
        }
    }

    /// Creates a run and drives it through `pending -> init -> planning ->
    /// success`. On failure the run is moved to `failed` with an
    /// `=== ERROR ===` section appended to its log; recording that failure
    /// is best-effort and never masks the original error.
    pub async fn plan(
        &self,
        kind: &str,
        variant: Option<&str>,
        variables: &IndexMap<String, String>,
    ) -> Result<PlanOutcome> {
        if kind.trim().is_empty() {
            return Err(AppError::Validation("kind is required".to_string()));
        }

        let variables_json = serde_json::to_string(variables)
            .map_err(|e| AppError::Validation(format!("Invalid variables: {}", e)))?;

        let run = self.run_repo.create(kind, &variables_json).await?;
        tracing::info!("[Run {}] Created, kind={}", run.id, kind);

        match self.plan_pipeline(&run, variant, variables).await {
            Ok(output) => Ok(PlanOutcome {
                run_id: run.id,
                output,
            }),
            Err((err, mut output)) => {
                let blob = failure_text(&err);
                output.push_str(&format!("\n=== ERROR ===\n{}", blob));
                let message = format!("Terraform execution failed: {}", blob);

                if let Err(update_err) = self
                    .run_repo
                    .transition(run.id, RunStatus::Failed, Some(&output), Some(&message))
                    .await
                {
                    tracing::error!(
                        "[Run {}] Failed to record failure: {}",
                        run.id,
                        update_err
                    );
                }

                Err(err)
            }
        }
    }

    /// The strictly sequential plan steps. Returns the combined log on
    /// success, or the error paired with whatever log had accumulated.
    async fn plan_pipeline(
        &self,
        run: &ProvisioningRun,
        variant: Option<&str>,
        variables: &IndexMap<String, String>,
    ) -> std::result::Result<String, (AppError, String)> {
        let mut combined = String::new();

        let result = self.materialize_working_dir(run, variant, variables).await;
        let dir = match result {
            Ok(dir) => dir,
            Err(e) => return Err((e, combined)),
        };

        if let Err(e) = self
            .run_repo
            .transition(run.id, RunStatus::Init, None, None)
            .await
        {
            return Err((e, combined));
        }

        tracing::info!("[Run {}] Running terraform init...", run.id);
        match self.terraform.init(&dir).await {
            Ok(out) => combined.push_str(&format!(
                "=== TERRAFORM INIT ===\n{}\n{}\n\n",
                out.stdout, out.stderr
            )),
            Err(e) => return Err((e, combined)),
        }

        if let Err(e) = self
            .run_repo
            .transition(run.id, RunStatus::Planning, Some(&combined), None)
            .await
        {
            return Err((e, combined));
        }

        tracing::info!("[Run {}] Running terraform plan...", run.id);
        match self.terraform.plan(&dir).await {
            Ok(out) => combined.push_str(&format!(
                "=== TERRAFORM PLAN ===\n{}\n{}",
                out.stdout, out.stderr
            )),
            Err(e) => return Err((e, combined)),
        }

        tracing::info!("[Run {}] Rendering {}...", run.id, PLAN_TEXT_FILE);
        match self.terraform.show(&dir).await {
            Ok(out) => {
                if let Err(e) = std::fs::write(dir.join(PLAN_TEXT_FILE), out.stdout) {
                    return Err((e.into(), combined));
                }
            }
            Err(e) => return Err((e, combined)),
        }

        if let Err(e) = self
            .run_repo
            .transition(run.id, RunStatus::Success, Some(&combined), None)
            .await
        {
            return Err((e, combined));
        }

        tracing::info!("[Run {}] Plan completed successfully", run.id);
        Ok(combined)
    }

    /// Creates the run's working directory and writes the template body,
    /// variable declarations and the tfvars assignment file.
    async fn materialize_working_dir(
        &self,
        run: &ProvisioningRun,
        variant: Option<&str>,
        variables: &IndexMap<String, String>,
    ) -> Result<PathBuf> {
        let dir = self.run_dir(run.id);
        std::fs::create_dir_all(&dir)?;

        let (body, variables_body) = match self.template_repo.get(&run.kind, variant).await? {
            Some(template) => (template.body, template.variables_body),
            None => (
                DEFAULT_RG_TEMPLATE.to_string(),
                DEFAULT_RG_VARIABLES.to_string(),
            ),
        };

        std::fs::write(dir.join(MAIN_TF_FILE), body)?;
        std::fs::write(dir.join(VARIABLES_TF_FILE), variables_body)?;
        std::fs::write(dir.join(TFVARS_FILE), tfvars::render(variables))?;

        Ok(dir)
    }

    /// Applies the plan artifact of a run that planned successfully.
    /// Returns the apply section appended to the run's log.
    pub async fn apply(&self, id: i64) -> Result<String> {
        let run = self.run_repo.get(id).await?;

        self.run_repo
            .transition(id, RunStatus::Applying, None, None)
            .await?;

        let dir = self.run_dir(id);
        tracing::info!("[Run {}] Running terraform apply...", id);

        match self.terraform.apply(&dir).await {
            Ok(out) => {
                let apply_output =
                    format!("=== TERRAFORM APPLY ===\n{}\n{}", out.stdout, out.stderr);
                let combined = append_section(run.output.as_deref(), &apply_output);

                self.run_repo
                    .transition(id, RunStatus::Applied, Some(&combined), None)
                    .await?;

                tracing::info!("[Run {}] Apply completed successfully", id);
                Ok(apply_output)
            }
            Err(err) => {
                let blob = failure_text(&err);
                let error_output = format!("=== ERROR ===\n{}", blob);
                let combined = append_section(run.output.as_deref(), &error_output);
                let message = format!("Terraform apply failed: {}", blob);

                if let Err(update_err) = self
                    .run_repo
                    .transition(id, RunStatus::ApplyFailed, Some(&combined), Some(&message))
                    .await
                {
                    tracing::error!("[Run {}] Failed to record failure: {}", id, update_err);
                }

                Err(err)
            }
        }
    }

    pub async fn get_run(&self, id: i64) -> Result<ProvisioningRun> {
        self.run_repo.get(id).await
    }

    pub async fn list_runs(&self) -> Result<Vec<ProvisioningRun>> {
        self.run_repo.list().await
    }

    /// Reads the rendered plan text produced by the `show` step.
    pub async fn plan_text(&self, id: i64) -> Result<String> {
        let run = self.run_repo.get(id).await?;
        let path = self.run_dir(run.id).join(PLAN_TEXT_FILE);
        if !path.is_file() {
            return Err(AppError::PlanFileNotFound(id));
        }

        Ok(std::fs::read_to_string(path)?)
    }

    fn run_dir(&self, id: i64) -> PathBuf {
        self.terraform_root.join(id.to_string())
    }
}

fn append_section(existing: Option<&str>, section: &str) -> String {
    format!("{}\n\n{}", existing.unwrap_or_default(), section)
}

/// The opaque text stored for a failed step: the subprocess output blob when
/// there is one, the error's message otherwise.
fn failure_text(err: &AppError) -> String {
    match err {
        AppError::Terraform(blob) => blob.clone(),
        other => other.to_string(),
    }
}
