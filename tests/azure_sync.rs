//! Cloud sync job against a stubbed Azure Resource Manager endpoint.

use serde_json::json;
use tempfile::TempDir;
use terradmin_node::azure::AzureClient;
use terradmin_node::error::AppError;
use terradmin_node::models::VmStatus;
use terradmin_node::repository::{InventoryRepository, establish_connection};
use terradmin_node::services::SyncService;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUB: &str = "sub-1";
const VM_ID: &str =
    "/subscriptions/sub-1/resourceGroups/rg-test/providers/Microsoft.Compute/virtualMachines/vm-1";
const NIC_ID: &str =
    "/subscriptions/sub-1/resourceGroups/rg-test/providers/Microsoft.Network/networkInterfaces/nic-1";
const PUBLIC_IP_ID: &str =
    "/subscriptions/sub-1/resourceGroups/rg-test/providers/Microsoft.Network/publicIPAddresses/ip-1";

struct Harness {
    service: SyncService,
    inventory: InventoryRepository,
    server: MockServer,
    _root: TempDir,
}

async fn harness() -> Harness {
    let root = TempDir::new().unwrap();
    let pool = establish_connection(&format!(
        "sqlite:{}",
        root.path().join("test.db").display()
    ))
    .await
    .unwrap();

    let server = MockServer::start().await;
    let client = AzureClient::new()
        .with_base_url(server.uri())
        .with_token("test-token");

    Harness {
        service: SyncService::new(InventoryRepository::new(pool.clone()), client),
        inventory: InventoryRepository::new(pool),
        server,
        _root: root,
    }
}

async fn save_config(h: &Harness) {
    h.service
        .save_config(SUB, "Test Subscription", Some("tenant-1"), Some("Enabled"))
        .await
        .unwrap();
}

async fn mount_happy_path(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/subscriptions/{}/resourcegroups", SUB)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "id": format!("/subscriptions/{}/resourceGroups/rg-test", SUB),
                "name": "rg-test",
                "location": "eastus",
                "properties": { "provisioningState": "Succeeded" },
                "tags": { "env": "test" }
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/subscriptions/{}/providers/Microsoft.Compute/virtualMachines",
            SUB
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "id": VM_ID,
                "name": "vm-1",
                "location": "eastus",
                "properties": {
                    "vmId": "11111111-2222-3333-4444-555555555555",
                    "provisioningState": "Succeeded",
                    "hardwareProfile": { "vmSize": "Standard_B2s" },
                    "storageProfile": { "osDisk": { "osType": "Linux" } },
                    "osProfile": { "computerName": "vm-1" },
                    "networkProfile": { "networkInterfaces": [{ "id": NIC_ID }] }
                }
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/instanceView", VM_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statuses": [
                { "code": "ProvisioningState/succeeded" },
                { "code": "PowerState/running" }
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(NIC_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": {
                "ipConfigurations": [{
                    "properties": {
                        "privateIPAddress": "10.0.0.4",
                        "publicIPAddress": { "id": PUBLIC_IP_ID }
                    }
                }]
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(PUBLIC_IP_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": { "ipAddress": "20.1.2.3" }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn sync_upserts_groups_and_vms() {
    let h = harness().await;
    save_config(&h).await;
    mount_happy_path(&h.server).await;

    let stats = h.service.sync().await.unwrap();
    assert_eq!(stats.resource_groups, 1);
    assert_eq!(stats.total_vms, 1);
    assert_eq!(stats.running, 1);
    assert_eq!(stats.stopped, 0);

    let (vms, _) = h.service.list_vms().await.unwrap();
    assert_eq!(vms.len(), 1);

    let vm = &vms[0];
    assert_eq!(vm.instance_id, VM_ID);
    assert_eq!(vm.status, VmStatus::Running);
    assert_eq!(vm.power_state, "running");
    assert_eq!(vm.size, "Standard_B2s");
    assert_eq!(vm.resource_group.as_deref(), Some("rg-test"));
    assert_eq!(vm.private_ip_address.as_deref(), Some("10.0.0.4"));
    assert_eq!(vm.public_ip_address.as_deref(), Some("20.1.2.3"));
    assert_eq!(vm.os_type.as_deref(), Some("Linux"));
}

#[tokio::test]
async fn sync_is_idempotent_across_runs() {
    let h = harness().await;
    save_config(&h).await;
    mount_happy_path(&h.server).await;

    h.service.sync().await.unwrap();
    let stats = h.service.sync().await.unwrap();

    assert_eq!(stats.total_vms, 1);
    let (vms, stats) = h.service.list_vms().await.unwrap();
    assert_eq!(vms.len(), 1, "same instance id must upsert, not duplicate");
    assert_eq!(stats.resource_groups, 1);
}

#[tokio::test]
async fn failing_group_listing_aborts_before_any_vm_is_stored() {
    let h = harness().await;
    save_config(&h).await;

    Mock::given(method("GET"))
        .and(path(format!("/subscriptions/{}/resourcegroups", SUB)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let err = h.service.sync().await.unwrap_err();
    assert!(matches!(err, AppError::Azure(_)));

    let (vms, stats) = h.service.list_vms().await.unwrap();
    assert!(vms.is_empty());
    assert_eq!(stats.resource_groups, 0);
}

#[tokio::test]
async fn failing_sync_leaves_prior_inventory_untouched() {
    let h = harness().await;
    save_config(&h).await;
    mount_happy_path(&h.server).await;

    h.service.sync().await.unwrap();

    h.server.reset().await;
    Mock::given(method("GET"))
        .and(path(format!("/subscriptions/{}/resourcegroups", SUB)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    h.service.sync().await.unwrap_err();

    let (vms, _) = h.service.list_vms().await.unwrap();
    assert_eq!(vms.len(), 1);
    assert_eq!(vms[0].public_ip_address.as_deref(), Some("20.1.2.3"));
}

#[tokio::test]
async fn sync_without_config_is_rejected() {
    let h = harness().await;

    let err = h.service.sync().await.unwrap_err();
    assert!(matches!(err, AppError::AzureNotConfigured));

    let count = h.inventory.count_resource_groups("AZURE").await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn config_upsert_replaces_the_azure_record() {
    let h = harness().await;

    save_config(&h).await;
    let updated = h
        .service
        .save_config("sub-2", "Other Subscription", None, None)
        .await
        .unwrap();
    assert_eq!(updated.subscription_id, "sub-2");

    let config = h.service.get_config().await.unwrap().unwrap();
    assert_eq!(config.subscription_id, "sub-2");
    assert_eq!(config.subscription_name, "Other Subscription");
}

#[tokio::test]
async fn subscriptions_are_listed_from_the_management_api() {
    let h = harness().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "subscriptionId": "sub-1",
                "displayName": "Test Subscription",
                "state": "Enabled",
                "tenantId": "tenant-1"
            }]
        })))
        .mount(&h.server)
        .await;

    let subscriptions = h.service.list_subscriptions().await.unwrap();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].subscription_id, "sub-1");
    assert_eq!(subscriptions[0].display_name, "Test Subscription");
}
