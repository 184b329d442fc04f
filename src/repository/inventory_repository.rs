use crate::error::Result;
use crate::models::{CloudConfig, ResourceGroup, VirtualMachine};
use crate::repository::DbPool;
use chrono::Utc;

#[derive(Clone)]
pub struct InventoryRepository {
    pool: DbPool,
}

impl InventoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get_config(&self, key: &str) -> Result<Option<CloudConfig>> {
        let config =
            sqlx::query_as::<_, CloudConfig>("SELECT * FROM cloud_configs WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(config)
    }

    pub async fn upsert_config(
        &self,
        key: &str,
        subscription_id: &str,
        subscription_name: &str,
        tenant_id: Option<&str>,
        state: Option<&str>,
    ) -> Result<CloudConfig> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO cloud_configs (key, subscription_id, subscription_name, tenant_id, state, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 1, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                subscription_id = excluded.subscription_id,
                subscription_name = excluded.subscription_name,
                tenant_id = excluded.tenant_id,
                state = excluded.state,
                is_active = 1,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(subscription_id)
        .bind(subscription_name)
        .bind(tenant_id)
        .bind(state)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let config = sqlx::query_as::<_, CloudConfig>("SELECT * FROM cloud_configs WHERE key = ?")
            .bind(key)
            .fetch_one(&self.pool)
            .await?;

        Ok(config)
    }

    pub async fn upsert_resource_group(&self, group: &ResourceGroup) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO resource_groups (name, location, subscription_id, provider, provisioning_state, tags, created_at, last_synced_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                location = excluded.location,
                subscription_id = excluded.subscription_id,
                provisioning_state = excluded.provisioning_state,
                tags = excluded.tags,
                last_synced_at = excluded.last_synced_at
            "#,
        )
        .bind(&group.name)
        .bind(&group.location)
        .bind(&group.subscription_id)
        .bind(&group.provider)
        .bind(&group.provisioning_state)
        .bind(&group.tags)
        .bind(group.created_at)
        .bind(group.last_synced_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn upsert_vm(&self, vm: &VirtualMachine) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO virtual_machines (
                instance_id, name, provider, status, power_state, provisioning_state,
                region, size, os_type, computer_name, public_ip_address, private_ip_address,
                resource_group, subscription_id, vm_id, network_interfaces, tags,
                created_at, last_synced_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(instance_id) DO UPDATE SET
                name = excluded.name,
                status = excluded.status,
                power_state = excluded.power_state,
                provisioning_state = excluded.provisioning_state,
                region = excluded.region,
                size = excluded.size,
                os_type = excluded.os_type,
                computer_name = excluded.computer_name,
                public_ip_address = excluded.public_ip_address,
                private_ip_address = excluded.private_ip_address,
                resource_group = excluded.resource_group,
                subscription_id = excluded.subscription_id,
                vm_id = excluded.vm_id,
                network_interfaces = excluded.network_interfaces,
                tags = excluded.tags,
                last_synced_at = excluded.last_synced_at
            "#,
        )
        .bind(&vm.instance_id)
        .bind(&vm.name)
        .bind(&vm.provider)
        .bind(vm.status as i32)
        .bind(&vm.power_state)
        .bind(&vm.provisioning_state)
        .bind(&vm.region)
        .bind(&vm.size)
        .bind(&vm.os_type)
        .bind(&vm.computer_name)
        .bind(&vm.public_ip_address)
        .bind(&vm.private_ip_address)
        .bind(&vm.resource_group)
        .bind(&vm.subscription_id)
        .bind(&vm.vm_id)
        .bind(&vm.network_interfaces)
        .bind(&vm.tags)
        .bind(vm.created_at)
        .bind(vm.last_synced_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_vms(&self, provider: &str) -> Result<Vec<VirtualMachine>> {
        let vms = sqlx::query_as::<_, VirtualMachine>(
            "SELECT * FROM virtual_machines WHERE provider = ? ORDER BY name ASC",
        )
        .bind(provider)
        .fetch_all(&self.pool)
        .await?;

        Ok(vms)
    }

    pub async fn count_resource_groups(&self, provider: &str) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM resource_groups WHERE provider = ?")
                .bind(provider)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }
}
