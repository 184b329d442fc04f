use crate::models::Template;
use crate::services::TemplateService;
use crate::terraform::hcl::VariableDecl;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TemplateQuery {
    pub resource: Option<String>,
    pub variant: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveTemplateRequest {
    pub resource: String,
    pub variant: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub body: String,
    pub variables_body: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub id: String,
    pub resource: String,
    pub variant: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub body: String,
    pub variables_body: String,
    /// Scanned variable declarations, in file order.
    pub variables: Vec<VariableDecl>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Template> for TemplateResponse {
    fn from(template: Template) -> Self {
        let variables = TemplateService::scan_variables(&template);
        Self {
            id: template.id,
            resource: template.resource,
            variant: template.variant,
            name: template.name,
            description: template.description,
            body: template.body,
            variables_body: template.variables_body,
            variables,
            created_at: template.created_at.to_rfc3339(),
            updated_at: template.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateLookupResponse {
    pub template: Option<TemplateResponse>,
}

#[derive(Debug, Serialize)]
pub struct TemplatesListResponse {
    pub data: Vec<TemplateResponse>,
}
