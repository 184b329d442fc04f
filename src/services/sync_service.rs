use crate::azure::AzureClient;
use crate::azure::types::{Subscription, VmItem};
use crate::error::{AppError, Result};
use crate::models::{CloudConfig, ResourceGroup, VirtualMachine, VmStatus};
use crate::repository::InventoryRepository;
use chrono::Utc;
use serde::Serialize;

pub const PROVIDER_AZURE: &str = "AZURE";

#[derive(Debug, Serialize)]
pub struct SyncStats {
    pub total_vms: usize,
    pub running: usize,
    pub stopped: usize,
    pub resource_groups: usize,
}

/// Mirrors Azure inventory into the database. The fetch sequence is fixed
/// and fully sequential; any non-2xx response aborts the whole sync, and
/// rows already upserted stay in place (no wrapping transaction).
#[derive(Clone)]
pub struct SyncService {
    repo: InventoryRepository,
    client: AzureClient,
}

impl SyncService {
    pub fn new(repo: InventoryRepository, client: AzureClient) -> Self {
        Self { repo, client }
    }

    pub async fn get_config(&self) -> Result<Option<CloudConfig>> {
        self.repo.get_config(CloudConfig::AZURE_KEY).await
    }

    pub async fn save_config(
        &self,
        subscription_id: &str,
        subscription_name: &str,
        tenant_id: Option<&str>,
        state: Option<&str>,
    ) -> Result<CloudConfig> {
        if subscription_id.trim().is_empty() || subscription_name.trim().is_empty() {
            return Err(AppError::Validation(
                "subscription_id and subscription_name are required".to_string(),
            ));
        }

        self.repo
            .upsert_config(
                CloudConfig::AZURE_KEY,
                subscription_id,
                subscription_name,
                tenant_id,
                state,
            )
            .await
    }

    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        self.client.list_subscriptions().await
    }

    pub async fn list_vms(&self) -> Result<(Vec<VirtualMachine>, SyncStats)> {
        let vms = self.repo.list_vms(PROVIDER_AZURE).await?;
        let resource_groups = self.repo.count_resource_groups(PROVIDER_AZURE).await? as usize;
        let stats = stats_for(
            vms.iter().map(|vm| vm.status).collect::<Vec<_>>().as_slice(),
            resource_groups,
        );
        Ok((vms, stats))
    }

    pub async fn sync(&self) -> Result<SyncStats> {
        let config = self
            .repo
            .get_config(CloudConfig::AZURE_KEY)
            .await?
            .ok_or(AppError::AzureNotConfigured)?;
        let subscription_id = config.subscription_id;

        tracing::info!("Fetching resource groups...");
        let groups = self.client.list_resource_groups(&subscription_id).await?;
        let now = Utc::now();

        for group in &groups {
            let record = ResourceGroup {
                name: group.name.clone(),
                location: group.location.clone(),
                subscription_id: subscription_id.clone(),
                provider: PROVIDER_AZURE.to_string(),
                provisioning_state: group
                    .properties
                    .as_ref()
                    .and_then(|p| p.provisioning_state.clone()),
                tags: group.tags.as_ref().map(|t| t.to_string()),
                created_at: now,
                last_synced_at: now,
            };
            self.repo.upsert_resource_group(&record).await?;
        }
        tracing::info!("Synced {} resource groups", groups.len());

        tracing::info!("Fetching VMs...");
        let vms = self.client.list_virtual_machines(&subscription_id).await?;
        let mut statuses = Vec::with_capacity(vms.len());
        for vm in vms {
            statuses.push(self.sync_vm(vm, &subscription_id).await?);
        }
        tracing::info!("Synced {} VMs", statuses.len());

        Ok(stats_for(&statuses, groups.len()))
    }

    /// One VM: instance view for power state, then each NIC's IP
    /// configurations (with a nested fetch for any public IP resource),
    /// then the upsert keyed by the Azure resource id.
    async fn sync_vm(&self, vm: VmItem, subscription_id: &str) -> Result<VmStatus> {
        let properties = vm.properties.unwrap_or_default();
        let provisioning_state = properties
            .provisioning_state
            .unwrap_or_else(|| "Unknown".to_string());

        let instance_view = self.client.instance_view(&vm.id).await?;
        let power_state = instance_view
            .statuses
            .iter()
            .find_map(|s| s.code.strip_prefix("PowerState/"))
            .unwrap_or("Unknown")
            .to_string();

        let status = VmStatus::derive(&power_state, &provisioning_state);

        let nic_ids: Vec<String> = properties
            .network_profile
            .map(|p| p.network_interfaces.into_iter().map(|n| n.id).collect())
            .unwrap_or_default();

        let mut public_ip = None;
        let mut private_ip = None;
        for nic_id in &nic_ids {
            let nic = self.client.network_interface(nic_id).await?;
            let configurations = nic.properties.map(|p| p.ip_configurations).unwrap_or_default();

            for configuration in configurations {
                let Some(props) = configuration.properties else {
                    continue;
                };
                if let Some(private) = props.private_ip_address {
                    private_ip = Some(private);
                }
                if let Some(public_ref) = props.public_ip_address {
                    let resource = self.client.public_ip(&public_ref.id).await?;
                    if let Some(address) = resource.properties.and_then(|p| p.ip_address) {
                        public_ip = Some(address);
                    }
                }
            }
        }

        let now = Utc::now();
        let record = VirtualMachine {
            instance_id: vm.id.clone(),
            name: vm.name,
            provider: PROVIDER_AZURE.to_string(),
            status,
            power_state,
            provisioning_state,
            region: vm.location,
            size: properties
                .hardware_profile
                .and_then(|p| p.vm_size)
                .unwrap_or_else(|| "Unknown".to_string()),
            os_type: properties
                .storage_profile
                .and_then(|p| p.os_disk)
                .and_then(|d| d.os_type),
            computer_name: properties.os_profile.and_then(|p| p.computer_name),
            public_ip_address: public_ip,
            private_ip_address: private_ip,
            resource_group: resource_group_from_id(&vm.id),
            subscription_id: subscription_id.to_string(),
            vm_id: properties.vm_id,
            network_interfaces: serde_json::to_string(&nic_ids).ok(),
            tags: vm.tags.map(|t| t.to_string()),
            created_at: now,
            last_synced_at: now,
        };
        self.repo.upsert_vm(&record).await?;

        Ok(status)
    }
}

fn stats_for(statuses: &[VmStatus], resource_groups: usize) -> SyncStats {
    SyncStats {
        total_vms: statuses.len(),
        running: statuses
            .iter()
            .filter(|s| **s == VmStatus::Running)
            .count(),
        stopped: statuses
            .iter()
            .filter(|s| matches!(s, VmStatus::Stopped | VmStatus::Deallocated))
            .count(),
        resource_groups,
    }
}

/// Extracts the resource group name from a full Azure resource id.
fn resource_group_from_id(id: &str) -> Option<String> {
    let idx = id.find("/resourceGroups/")?;
    let rest = &id[idx + "/resourceGroups/".len()..];
    let end = rest.find('/').unwrap_or(rest.len());
    let name = &rest[..end];
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_group_is_extracted_from_resource_id() {
        let id = "/subscriptions/sub-1/resourceGroups/rg-test/providers/Microsoft.Compute/virtualMachines/vm-1";
        assert_eq!(resource_group_from_id(id), Some("rg-test".to_string()));
    }

    #[test]
    fn resource_group_absent_from_malformed_id() {
        assert_eq!(resource_group_from_id("/subscriptions/sub-1"), None);
        assert_eq!(resource_group_from_id("/resourceGroups/"), None);
    }

    #[test]
    fn stats_count_running_and_stopped() {
        let stats = stats_for(
            &[
                VmStatus::Running,
                VmStatus::Stopped,
                VmStatus::Deallocated,
                VmStatus::Creating,
            ],
            3,
        );
        assert_eq!(stats.total_vms, 4);
        assert_eq!(stats.running, 1);
        assert_eq!(stats.stopped, 2);
        assert_eq!(stats.resource_groups, 3);
    }
}
