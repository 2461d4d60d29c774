//! Tenants listing (`admin/multitenancy`)

use log::debug;

use crate::config::api;
use crate::error::Result;

use super::traits::ApiApplication;
use super::ProxyClient;

/// Client for the admin/multitenancy endpoints
pub struct Multitenancy<'a> {
    proxy: &'a ProxyClient,
}

impl ApiApplication for Multitenancy<'_> {
    const APP_PATH: &'static str = api::MULTITENANCY;

    fn proxy(&self) -> &ProxyClient {
        self.proxy
    }
}

impl<'a> Multitenancy<'a> {
    pub fn new(proxy: &'a ProxyClient) -> Self {
        Self { proxy }
    }

    /// List tenants known to the proxy
    pub async fn list_tenants(&self) -> Result<serde_json::Value> {
        let path = format!("{}/tenants", self.base_path());
        debug!("list_tenants path {}", path);

        let response = self.proxy.client().get(&path).await?;
        Ok(response.json().await?)
    }
}
