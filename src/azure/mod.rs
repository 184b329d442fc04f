//! Azure Resource Manager client.
//!
//! Bearer-token HTTPS GETs against the management endpoint. Tokens come
//! from the locally cached Azure CLI credentials (`az account
//! get-access-token`); there is no retry, no pagination handling and no
//! rate-limit backoff. Any non-2xx response surfaces as an error.

pub mod types;

use crate::error::{AppError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::process::Command;

use types::{
    InstanceView, ListResponse, NicItem, PublicIpItem, ResourceGroupItem, Subscription, VmItem,
};

pub const MANAGEMENT_BASE_URL: &str = "https://management.azure.com";

const SUBSCRIPTIONS_API_VERSION: &str = "2022-12-01";
const RESOURCE_GROUPS_API_VERSION: &str = "2021-04-01";
const VIRTUAL_MACHINES_API_VERSION: &str = "2023-03-01";
const INSTANCE_VIEW_API_VERSION: &str = "2023-03-01";
const NETWORK_API_VERSION: &str = "2023-05-01";

#[derive(Clone)]
pub struct AzureClient {
    client: reqwest::Client,
    base_url: String,
    /// Static bearer token; when unset, one is fetched from the Azure CLI
    /// per call batch.
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliToken {
    access_token: String,
}

impl AzureClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: MANAGEMENT_BASE_URL.to_string(),
            token: None,
        }
    }

    /// Points the client at a different management endpoint. Used by tests
    /// to target a local stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Resolves a management-plane bearer token from the CLI credential
    /// cache.
    pub async fn access_token(&self) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        let output = Command::new("az")
            .args([
                "account",
                "get-access-token",
                "--resource",
                MANAGEMENT_BASE_URL,
                "--output",
                "json",
            ])
            .output()
            .await
            .map_err(|e| AppError::Azure(format!("Failed to run az cli: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Azure(format!(
                "Failed to get access token. Make sure you are authenticated with Azure CLI (az login): {}",
                stderr.trim()
            )));
        }

        let token: CliToken = serde_json::from_slice(&output.stdout)
            .map_err(|e| AppError::Azure(format!("Unexpected az cli token output: {}", e)))?;

        Ok(token.access_token)
    }

    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let path = format!("/subscriptions?api-version={}", SUBSCRIPTIONS_API_VERSION);
        let response: ListResponse<Subscription> = self.get(&path).await?;
        Ok(response.value)
    }

    pub async fn list_resource_groups(
        &self,
        subscription_id: &str,
    ) -> Result<Vec<ResourceGroupItem>> {
        let path = format!(
            "/subscriptions/{}/resourcegroups?api-version={}",
            subscription_id, RESOURCE_GROUPS_API_VERSION
        );
        let response: ListResponse<ResourceGroupItem> = self.get(&path).await?;
        Ok(response.value)
    }

    pub async fn list_virtual_machines(&self, subscription_id: &str) -> Result<Vec<VmItem>> {
        let path = format!(
            "/subscriptions/{}/providers/Microsoft.Compute/virtualMachines?api-version={}",
            subscription_id, VIRTUAL_MACHINES_API_VERSION
        );
        let response: ListResponse<VmItem> = self.get(&path).await?;
        Ok(response.value)
    }

    /// `resource_id` is the full Azure resource id, which already starts
    /// with `/subscriptions/...`.
    pub async fn instance_view(&self, resource_id: &str) -> Result<InstanceView> {
        let path = format!(
            "{}/instanceView?api-version={}",
            resource_id, INSTANCE_VIEW_API_VERSION
        );
        self.get(&path).await
    }

    pub async fn network_interface(&self, resource_id: &str) -> Result<NicItem> {
        let path = format!("{}?api-version={}", resource_id, NETWORK_API_VERSION);
        self.get(&path).await
    }

    pub async fn public_ip(&self, resource_id: &str) -> Result<PublicIpItem> {
        let path = format!("{}?api-version={}", resource_id, NETWORK_API_VERSION);
        self.get(&path).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.access_token().await?;

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| AppError::Azure(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Azure(format!(
                "Azure API returned {} for {}",
                status, path
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Azure(format!("Failed to parse response from {}: {}", path, e)))
    }
}

impl Default for AzureClient {
    fn default() -> Self {
        Self::new()
    }
}
