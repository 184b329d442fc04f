use crate::api::dto::run::{
    ApplyResponse, CreatePlanRequest, PlanCreatedResponse, PlanTextResponse, RunLogsResponse,
    RunResponse, RunsListResponse,
};
use crate::api::routes::AppState;
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, State},
};

pub async fn create_plan(
    State(state): State<AppState>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<Json<PlanCreatedResponse>> {
    let outcome = state
        .provision_service
        .plan(&req.kind, req.variant.as_deref(), &req.variables)
        .await?;

    Ok(Json(PlanCreatedResponse {
        id: outcome.run_id,
        message: "Terraform plan created and executed successfully".to_string(),
        output: outcome.output,
    }))
}

pub async fn list_runs(State(state): State<AppState>) -> Result<Json<RunsListResponse>> {
    let runs = state.provision_service.list_runs().await?;
    let data = runs
        .into_iter()
        .map(RunResponse::try_from)
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(RunsListResponse { data }))
}

pub async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RunResponse>> {
    let run = state.provision_service.get_run(id).await?;
    Ok(Json(RunResponse::try_from(run)?))
}

pub async fn get_run_logs(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RunLogsResponse>> {
    let run = state.provision_service.get_run(id).await?;
    Ok(Json(RunLogsResponse {
        status: run.status.to_string(),
        output: run.output.unwrap_or_else(|| "No logs available".to_string()),
    }))
}

pub async fn get_plan_text(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PlanTextResponse>> {
    let content = state.provision_service.plan_text(id).await?;
    Ok(Json(PlanTextResponse { content }))
}

pub async fn apply_run(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApplyResponse>> {
    let output = state.provision_service.apply(id).await?;
    Ok(Json(ApplyResponse {
        message: "Terraform apply completed successfully".to_string(),
        output,
    }))
}
