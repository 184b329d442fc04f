use super::handlers::{azure, health, run, template};
use super::middleware::cors::add_cors;
use crate::services::{ProvisionService, SyncService, TemplateService};
use axum::{
    Router,
    routing::{get, post, put},
};

#[derive(Clone)]
pub struct AppState {
    pub provision_service: ProvisionService,
    pub template_service: TemplateService,
    pub sync_service: SyncService,
}

pub fn create_router(
    provision_service: ProvisionService,
    template_service: TemplateService,
    sync_service: SyncService,
) -> Router {
    let state = AppState {
        provision_service,
        template_service,
        sync_service,
    };

    let api_routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Terraform runs
        .route("/api/terraform/plans", post(run::create_plan))
        .route("/api/terraform/plans", get(run::list_runs))
        .route("/api/terraform/plans/{id}", get(run::get_run))
        .route("/api/terraform/plans/{id}/logs", get(run::get_run_logs))
        .route("/api/terraform/plans/{id}/plan", get(run::get_plan_text))
        .route("/api/terraform/plans/{id}/apply", post(run::apply_run))
        // Templates
        .route("/api/terraform/templates", get(template::get_templates))
        .route("/api/terraform/templates", put(template::save_template))
        // Azure
        .route("/api/azure/config", get(azure::get_config))
        .route("/api/azure/config", put(azure::save_config))
        .route("/api/azure/subscriptions", get(azure::list_subscriptions))
        .route("/api/azure/sync", post(azure::sync))
        .route("/api/azure/vms", get(azure::list_vms))
        .with_state(state);

    add_cors(api_routes)
}
