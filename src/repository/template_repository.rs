use crate::error::Result;
use crate::models::Template;
use crate::repository::DbPool;
use chrono::Utc;
use uuid::Uuid;

#[derive(Clone)]
pub struct TemplateRepository {
    pool: DbPool,
}

impl TemplateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, resource: &str, variant: Option<&str>) -> Result<Option<Template>> {
        let template = sqlx::query_as::<_, Template>(
            "SELECT * FROM templates WHERE resource = ? AND variant IS ?",
        )
        .bind(resource)
        .bind(variant)
        .fetch_optional(&self.pool)
        .await?;

        Ok(template)
    }

    pub async fn list(&self) -> Result<Vec<Template>> {
        let templates =
            sqlx::query_as::<_, Template>("SELECT * FROM templates ORDER BY resource ASC, variant ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(templates)
    }

    /// Writes a template under its `(resource, variant)` key, replacing the
    /// bodies when the key already exists.
    pub async fn upsert(
        &self,
        resource: &str,
        variant: Option<&str>,
        name: &str,
        description: Option<&str>,
        body: &str,
        variables_body: &str,
    ) -> Result<Template> {
        let now = Utc::now();

        if let Some(existing) = self.get(resource, variant).await? {
            sqlx::query(
                r#"
                UPDATE templates
                SET name = ?, description = ?, body = ?, variables_body = ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(name)
            .bind(description)
            .bind(body)
            .bind(variables_body)
            .bind(now)
            .bind(&existing.id)
            .execute(&self.pool)
            .await?;

            return Ok(Template {
                name: name.to_string(),
                description: description.map(str::to_string),
                body: body.to_string(),
                variables_body: variables_body.to_string(),
                updated_at: now,
                ..existing
            });
        }

        let template = Template {
            id: Uuid::new_v4().to_string(),
            resource: resource.to_string(),
            variant: variant.map(str::to_string),
            name: name.to_string(),
            description: description.map(str::to_string),
            body: body.to_string(),
            variables_body: variables_body.to_string(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO templates (id, resource, variant, name, description, body, variables_body, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&template.id)
        .bind(&template.resource)
        .bind(&template.variant)
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.body)
        .bind(&template.variables_body)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(template)
    }
}
