//! Mints replacement tokens through the proxy admin API

use log::{debug, error, info};

use crate::error::Result;
use crate::proxy::{AdminAuth, ApiClient, ApiEndpoint, Multitenancy, ProxyClient, VirtualClusters};

use super::admin::AdminCredentials;
use super::claims::TokenIdentity;

/// Issues tokens for tenants and vCluster users
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    endpoint: ApiEndpoint,
    api_version: String,
    ignore_ssl_errors: bool,
}

impl TokenIssuer {
    pub fn new(endpoint: ApiEndpoint, api_version: impl Into<String>, ignore_ssl_errors: bool) -> Self {
        Self {
            endpoint,
            api_version: api_version.into(),
            ignore_ssl_errors,
        }
    }

    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    fn proxy_for(&self, admin: &AdminCredentials) -> Result<ProxyClient> {
        let client = ApiClient::new(
            self.endpoint.clone(),
            Some(admin.username.clone()),
            Some(admin.password.clone()),
            self.ignore_ssl_errors,
        )?;
        Ok(ProxyClient::new(client, self.api_version.clone()))
    }

    /// Create a token for `identity` valid for `lifetime_in_seconds`
    pub async fn issue(
        &self,
        admin: &AdminCredentials,
        identity: &TokenIdentity,
        lifetime_in_seconds: u64,
    ) -> Result<String> {
        let proxy = self.proxy_for(admin)?;
        info!("Creating new token for {}", identity);

        let result = match identity {
            TokenIdentity::Tenant { name } => {
                match Multitenancy::new(&proxy).list_tenants().await {
                    Ok(tenants) => debug!("Tenants: {}", tenants),
                    Err(e) => debug!("Could not list tenants: {}", e),
                }
                AdminAuth::new(&proxy)
                    .create_tenant_credentials(name, Some(lifetime_in_seconds))
                    .await
            }
            TokenIdentity::VirtualCluster { name, username } => {
                match VirtualClusters::new(&proxy).list_vclusters().await {
                    Ok(vclusters) => debug!("vClusters: {}", vclusters),
                    Err(e) => debug!("Could not list vclusters: {}", e),
                }
                VirtualClusters::new(&proxy)
                    .create_vcluster_user_token(name, Some(username), Some(lifetime_in_seconds))
                    .await
            }
        };

        match result {
            Ok(response) => Ok(response.token),
            Err(e) => {
                error!("Failed to create token for {}: {}", identity, e);
                Err(e)
            }
        }
    }
}
