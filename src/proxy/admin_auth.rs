//! Tenant token issuance (`admin/auth`)

use log::debug;

use crate::config::{api, defaults};
use crate::error::Result;

use super::models::{TokenRequest, TokenResponse};
use super::traits::ApiApplication;
use super::ProxyClient;

/// Client for the admin/auth endpoints
pub struct AdminAuth<'a> {
    proxy: &'a ProxyClient,
}

impl ApiApplication for AdminAuth<'_> {
    const APP_PATH: &'static str = api::ADMIN_AUTH;

    fn proxy(&self) -> &ProxyClient {
        self.proxy
    }
}

impl<'a> AdminAuth<'a> {
    pub fn new(proxy: &'a ProxyClient) -> Self {
        Self { proxy }
    }

    /// Create a new token for a tenant. Default lifetime 900s (15 minutes).
    pub async fn create_tenant_credentials(
        &self,
        tenant_id: &str,
        lifetime_in_seconds: Option<u64>,
    ) -> Result<TokenResponse> {
        let payload = TokenRequest {
            life_time_seconds: lifetime_in_seconds
                .unwrap_or(defaults::TENANT_TOKEN_LIFETIME_SECS),
        };
        let path = format!(
            "{}/tenants/{}",
            self.base_path(),
            urlencoding::encode(tenant_id)
        );
        debug!("create_tenant_credentials path {}", path);

        let response = self.proxy.client().post(&path, &payload).await?;
        Ok(response.json().await?)
    }
}
