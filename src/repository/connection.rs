use crate::repository::DbPool;
use anyhow::Result;

pub async fn establish_connection(database_url: &str) -> Result<DbPool> {
    // Ensure the database URL has the correct format
    let db_url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{}", database_url)
    };

    // Create connection with create_if_missing option
    let connection_string = format!("{}?mode=rwc", db_url);
    let pool = sqlx::SqlitePool::connect(&connection_string).await?;

    // Run migrations
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS runs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            variables TEXT NOT NULL,
            status INTEGER NOT NULL,
            output TEXT,
            error_message TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS templates (
            id TEXT PRIMARY KEY,
            resource TEXT NOT NULL,
            variant TEXT,
            name TEXT NOT NULL,
            description TEXT,
            body TEXT NOT NULL,
            variables_body TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cloud_configs (
            key TEXT PRIMARY KEY,
            subscription_id TEXT NOT NULL,
            subscription_name TEXT NOT NULL,
            tenant_id TEXT,
            state TEXT,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS resource_groups (
            name TEXT PRIMARY KEY,
            location TEXT NOT NULL,
            subscription_id TEXT NOT NULL,
            provider TEXT NOT NULL,
            provisioning_state TEXT,
            tags TEXT,
            created_at TEXT NOT NULL,
            last_synced_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS virtual_machines (
            instance_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            provider TEXT NOT NULL,
            status INTEGER NOT NULL,
            power_state TEXT NOT NULL,
            provisioning_state TEXT NOT NULL,
            region TEXT NOT NULL,
            size TEXT NOT NULL,
            os_type TEXT,
            computer_name TEXT,
            public_ip_address TEXT,
            private_ip_address TEXT,
            resource_group TEXT,
            subscription_id TEXT NOT NULL,
            vm_id TEXT,
            network_interfaces TEXT,
            tags TEXT,
            created_at TEXT NOT NULL,
            last_synced_at TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_templates_resource_variant ON templates(resource, variant);
        CREATE INDEX IF NOT EXISTS idx_runs_updated_at ON runs(updated_at);
        CREATE INDEX IF NOT EXISTS idx_virtual_machines_name ON virtual_machines(name);
        "#,
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}
