use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reusable infrastructure template: the main body plus its variable
/// declarations, keyed by resource kind and an optional variant (e.g. the
/// VM OS flavor). Bicep bodies share the store under `bicep-*` kinds.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Template {
    pub id: String,
    pub resource: String,
    pub variant: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub body: String,
    pub variables_body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
