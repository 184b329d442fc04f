use crate::error::AppError;
use crate::models::ProvisioningRun;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub kind: String,
    pub variant: Option<String>,
    pub variables: IndexMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct PlanCreatedResponse {
    pub id: i64,
    pub message: String,
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub id: i64,
    pub kind: String,
    pub variables: Value,
    pub status: String,
    pub output: Option<String>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ProvisioningRun> for RunResponse {
    type Error = AppError;

    fn try_from(run: ProvisioningRun) -> Result<Self, Self::Error> {
        let variables = serde_json::from_str(&run.variables)
            .map_err(|e| AppError::Validation(format!("Stored variables are not JSON: {}", e)))?;
        Ok(Self {
            id: run.id,
            kind: run.kind,
            variables,
            status: run.status.to_string(),
            output: run.output,
            error_message: run.error_message,
            created_at: run.created_at.to_rfc3339(),
            updated_at: run.updated_at.to_rfc3339(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RunsListResponse {
    pub data: Vec<RunResponse>,
}

#[derive(Debug, Serialize)]
pub struct RunLogsResponse {
    pub status: String,
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct PlanTextResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub message: String,
    pub output: String,
}
