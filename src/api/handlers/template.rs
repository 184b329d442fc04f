use crate::api::dto::template::{
    SaveTemplateRequest, TemplateLookupResponse, TemplateQuery, TemplateResponse,
    TemplatesListResponse,
};
use crate::api::routes::AppState;
use crate::error::Result;
use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};

/// With `?resource=..` returns that one key (null when absent, so the UI
/// can fall back to its built-in body); otherwise lists every template.
pub async fn get_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> Result<Response> {
    if let Some(resource) = query.resource {
        let template = state
            .template_service
            .get_template(&resource, query.variant.as_deref())
            .await?;
        let response = TemplateLookupResponse {
            template: template.map(TemplateResponse::from),
        };
        return Ok(Json(response).into_response());
    }

    let templates = state.template_service.list_templates().await?;
    let response = TemplatesListResponse {
        data: templates.into_iter().map(TemplateResponse::from).collect(),
    };
    Ok(Json(response).into_response())
}

pub async fn save_template(
    State(state): State<AppState>,
    Json(req): Json<SaveTemplateRequest>,
) -> Result<Json<TemplateResponse>> {
    let template = state
        .template_service
        .save_template(
            &req.resource,
            req.variant.as_deref(),
            req.name.as_deref(),
            req.description.as_deref(),
            &req.body,
            &req.variables_body,
        )
        .await?;

    Ok(Json(TemplateResponse::from(template)))
}
