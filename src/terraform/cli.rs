use crate::error::{AppError, Result};
use crate::terraform::PLAN_FILE;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Captured stdout/stderr of one terraform invocation.
#[derive(Debug)]
pub struct TerraformOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Thin wrapper over the terraform binary. Invocations block the calling
/// request until the subprocess exits; there is no timeout and no
/// cancellation once a process has started. A non-zero exit status is the
/// sole failure signal.
#[derive(Clone)]
pub struct TerraformCli {
    binary: PathBuf,
}

impl TerraformCli {
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self {
            binary: binary.unwrap_or_else(|| PathBuf::from("terraform")),
        }
    }

    pub async fn init(&self, dir: &Path) -> Result<TerraformOutput> {
        self.run(&["init", "-no-color"], dir).await
    }

    pub async fn plan(&self, dir: &Path) -> Result<TerraformOutput> {
        self.run(&["plan", "-no-color", &format!("-out={}", PLAN_FILE)], dir)
            .await
    }

    pub async fn show(&self, dir: &Path) -> Result<TerraformOutput> {
        self.run(&["show", "-no-color", PLAN_FILE], dir).await
    }

    pub async fn apply(&self, dir: &Path) -> Result<TerraformOutput> {
        self.run(&["apply", "-no-color", PLAN_FILE], dir).await
    }

    async fn run(&self, args: &[&str], dir: &Path) -> Result<TerraformOutput> {
        tracing::debug!("Running terraform {} in {}", args[0], dir.display());

        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(dir)
            .output()
            .await
            .map_err(|e| {
                AppError::Terraform(format!(
                    "Failed to start {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(AppError::Terraform(failure_blob(
                &stdout,
                &stderr,
                &format!("terraform {} exited with {}", args[0], output.status),
            )));
        }

        Ok(TerraformOutput { stdout, stderr })
    }
}

impl Default for TerraformCli {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Joins the non-empty parts of stdout/stderr/message into the opaque text
/// blob stored on the run. Never parsed back into structured codes.
fn failure_blob(stdout: &str, stderr: &str, message: &str) -> String {
    let mut parts = Vec::new();
    if !stdout.trim().is_empty() {
        parts.push(stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        parts.push(stderr.trim_end());
    }
    if parts.is_empty() {
        parts.push(message);
    }
    parts.join("\n")
}
