use crate::error::{AppError, Result};
use crate::models::{ProvisioningRun, RunStatus};
use crate::repository::DbPool;
use chrono::Utc;

#[derive(Clone)]
pub struct RunRepository {
    pool: DbPool,
}

impl RunRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, kind: &str, variables_json: &str) -> Result<ProvisioningRun> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO runs (kind, variables, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(kind)
        .bind(variables_json)
        .bind(RunStatus::Pending as i32)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(ProvisioningRun {
            id: result.last_insert_rowid(),
            kind: kind.to_string(),
            variables: variables_json.to_string(),
            status: RunStatus::Pending,
            output: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get(&self, id: i64) -> Result<ProvisioningRun> {
        let run = sqlx::query_as::<_, ProvisioningRun>("SELECT * FROM runs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::RunNotFound(id))?;

        Ok(run)
    }

    pub async fn list(&self) -> Result<Vec<ProvisioningRun>> {
        let runs = sqlx::query_as::<_, ProvisioningRun>(
            "SELECT * FROM runs ORDER BY updated_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(runs)
    }

    /// Moves a run to `next`, rejecting anything the status machine does not
    /// allow. `output` and `error_message` replace the stored values when
    /// given and are left untouched when `None`. `updated_at` is touched on
    /// every transition.
    pub async fn transition(
        &self,
        id: i64,
        next: RunStatus,
        output: Option<&str>,
        error_message: Option<&str>,
    ) -> Result<()> {
        let current = self.get(id).await?;
        if !current.status.can_advance(next) {
            return Err(AppError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        sqlx::query(
            r#"
            UPDATE runs
            SET status = ?,
                output = COALESCE(?, output),
                error_message = COALESCE(?, error_message),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(next as i32)
        .bind(output)
        .bind(error_message)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
