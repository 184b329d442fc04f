use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Azure connection settings. Stored as a single record under the
/// well-known `azure` key rather than a magic singleton row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CloudConfig {
    pub key: String,
    pub subscription_id: String,
    pub subscription_name: String,
    pub tenant_id: Option<String>,
    pub state: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CloudConfig {
    pub const AZURE_KEY: &'static str = "azure";
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ResourceGroup {
    pub name: String,
    pub location: String,
    pub subscription_id: String,
    pub provider: String,
    pub provisioning_state: Option<String>,
    /// Raw tag map as JSON text.
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_synced_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VirtualMachine {
    /// Full Azure resource id; the stable external identifier.
    pub instance_id: String,
    pub name: String,
    pub provider: String,
    pub status: VmStatus,
    pub power_state: String,
    pub provisioning_state: String,
    pub region: String,
    pub size: String,
    pub os_type: Option<String>,
    pub computer_name: Option<String>,
    pub public_ip_address: Option<String>,
    pub private_ip_address: Option<String>,
    pub resource_group: Option<String>,
    pub subscription_id: String,
    pub vm_id: Option<String>,
    /// NIC resource ids as a JSON array.
    pub network_interfaces: Option<String>,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_synced_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[repr(i32)]
pub enum VmStatus {
    Running = 0,
    Stopped = 1,
    Deallocated = 2,
    Creating = 3,
    Deleting = 4,
    Error = 5,
}

impl VmStatus {
    /// Derives the coarse status from the instance-view power state, falling
    /// back to the provisioning state for in-flight VMs.
    pub fn derive(power_state: &str, provisioning_state: &str) -> Self {
        if power_state.contains("running") {
            VmStatus::Running
        } else if power_state.contains("deallocated") {
            VmStatus::Deallocated
        } else if power_state.contains("stopped") {
            VmStatus::Stopped
        } else if provisioning_state == "Creating" {
            VmStatus::Creating
        } else if provisioning_state == "Deleting" {
            VmStatus::Deleting
        } else {
            VmStatus::Stopped
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VmStatus::Running => "RUNNING",
            VmStatus::Stopped => "STOPPED",
            VmStatus::Deallocated => "DEALLOCATED",
            VmStatus::Creating => "CREATING",
            VmStatus::Deleting => "DELETING",
            VmStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for VmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_derivation_prefers_power_state() {
        assert_eq!(VmStatus::derive("running", "Succeeded"), VmStatus::Running);
        assert_eq!(
            VmStatus::derive("deallocated", "Succeeded"),
            VmStatus::Deallocated
        );
        assert_eq!(VmStatus::derive("stopped", "Succeeded"), VmStatus::Stopped);
        // Power state wins even while a provisioning operation is reported.
        assert_eq!(VmStatus::derive("running", "Creating"), VmStatus::Running);
    }

    #[test]
    fn status_derivation_falls_back_to_provisioning_state() {
        assert_eq!(VmStatus::derive("Unknown", "Creating"), VmStatus::Creating);
        assert_eq!(VmStatus::derive("Unknown", "Deleting"), VmStatus::Deleting);
        assert_eq!(VmStatus::derive("Unknown", "Succeeded"), VmStatus::Stopped);
    }
}
