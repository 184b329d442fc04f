use crate::error::{AppError, Result};
use crate::models::Template;
use crate::repository::TemplateRepository;
use crate::terraform::hcl::{self, VariableDecl};

#[derive(Clone)]
pub struct TemplateService {
    repo: TemplateRepository,
}

impl TemplateService {
    pub fn new(repo: TemplateRepository) -> Self {
        Self { repo }
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>> {
        self.repo.list().await
    }

    /// Looks up one template by key. `None` means the caller should fall
    /// back to its built-in body.
    pub async fn get_template(
        &self,
        resource: &str,
        variant: Option<&str>,
    ) -> Result<Option<Template>> {
        self.repo.get(resource, variant).await
    }

    pub async fn save_template(
        &self,
        resource: &str,
        variant: Option<&str>,
        name: Option<&str>,
        description: Option<&str>,
        body: &str,
        variables_body: &str,
    ) -> Result<Template> {
        if resource.trim().is_empty() {
            return Err(AppError::Validation("resource is required".to_string()));
        }
        if body.is_empty() || variables_body.is_empty() {
            return Err(AppError::Validation(
                "body and variables_body are required".to_string(),
            ));
        }

        let default_name = format!("{} Template", resource);
        let name = name.filter(|n| !n.trim().is_empty()).unwrap_or(&default_name);

        self.repo
            .upsert(resource, variant, name, description, body, variables_body)
            .await
    }

    /// The template's variable declarations, scanned into form inputs.
    pub fn scan_variables(template: &Template) -> Vec<VariableDecl> {
        hcl::scan_variables(&template.variables_body)
    }
}
