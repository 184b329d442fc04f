use crate::azure::types::Subscription;
use crate::models::{CloudConfig, VirtualMachine};
use crate::services::SyncStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SaveCloudConfigRequest {
    pub subscription_id: String,
    pub subscription_name: String,
    pub tenant_id: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CloudConfigBody {
    pub subscription_id: String,
    pub subscription_name: String,
    pub tenant_id: Option<String>,
    pub state: Option<String>,
    pub is_active: bool,
}

impl From<CloudConfig> for CloudConfigBody {
    fn from(config: CloudConfig) -> Self {
        Self {
            subscription_id: config.subscription_id,
            subscription_name: config.subscription_name,
            tenant_id: config.tenant_id,
            state: config.state,
            is_active: config.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CloudConfigResponse {
    pub connected: bool,
    pub config: Option<CloudConfigBody>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub name: String,
    pub state: Option<String>,
    pub tenant_id: Option<String>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.subscription_id,
            name: subscription.display_name,
            state: subscription.state,
            tenant_id: subscription.tenant_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubscriptionsListResponse {
    pub data: Vec<SubscriptionResponse>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub stats: SyncStats,
}

#[derive(Debug, Serialize)]
pub struct VmResponse {
    pub id: String,
    pub name: String,
    pub status: String,
    pub power_state: String,
    pub region: String,
    pub size: String,
    pub resource_group: Option<String>,
    pub public_ip_address: Option<String>,
    pub private_ip_address: Option<String>,
    pub os_type: Option<String>,
}

impl From<VirtualMachine> for VmResponse {
    fn from(vm: VirtualMachine) -> Self {
        Self {
            id: vm.instance_id,
            name: vm.name,
            status: vm.status.to_string(),
            power_state: vm.power_state,
            region: vm.region,
            size: vm.size,
            resource_group: vm.resource_group,
            public_ip_address: vm.public_ip_address,
            private_ip_address: vm.private_ip_address,
            os_type: vm.os_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VmsListResponse {
    pub data: Vec<VmResponse>,
    pub stats: SyncStats,
}
