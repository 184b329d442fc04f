use crate::api::dto::azure::{
    CloudConfigBody, CloudConfigResponse, SaveCloudConfigRequest, SubscriptionResponse,
    SubscriptionsListResponse, SyncResponse, VmResponse, VmsListResponse,
};
use crate::api::routes::AppState;
use crate::error::Result;
use axum::{Json, extract::State};

pub async fn get_config(State(state): State<AppState>) -> Result<Json<CloudConfigResponse>> {
    let config = state.sync_service.get_config().await?;
    Ok(Json(CloudConfigResponse {
        connected: config.is_some(),
        config: config.map(CloudConfigBody::from),
    }))
}

pub async fn save_config(
    State(state): State<AppState>,
    Json(req): Json<SaveCloudConfigRequest>,
) -> Result<Json<CloudConfigResponse>> {
    let config = state
        .sync_service
        .save_config(
            &req.subscription_id,
            &req.subscription_name,
            req.tenant_id.as_deref(),
            req.state.as_deref(),
        )
        .await?;

    Ok(Json(CloudConfigResponse {
        connected: true,
        config: Some(CloudConfigBody::from(config)),
    }))
}

pub async fn list_subscriptions(
    State(state): State<AppState>,
) -> Result<Json<SubscriptionsListResponse>> {
    let subscriptions = state.sync_service.list_subscriptions().await?;
    let data: Vec<SubscriptionResponse> = subscriptions
        .into_iter()
        .map(SubscriptionResponse::from)
        .collect();
    let count = data.len();
    Ok(Json(SubscriptionsListResponse { data, count }))
}

pub async fn sync(State(state): State<AppState>) -> Result<Json<SyncResponse>> {
    let stats = state.sync_service.sync().await?;
    Ok(Json(SyncResponse {
        message: "Azure resources synced successfully".to_string(),
        stats,
    }))
}

pub async fn list_vms(State(state): State<AppState>) -> Result<Json<VmsListResponse>> {
    let (vms, stats) = state.sync_service.list_vms().await?;
    Ok(Json(VmsListResponse {
        data: vms.into_iter().map(VmResponse::from).collect(),
        stats,
    }))
}
