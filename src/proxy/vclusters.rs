//! Virtual clusters (`admin/vclusters`)

use log::debug;

use crate::config::{api, defaults};
use crate::error::Result;

use super::models::{TokenRequest, TokenResponse};
use super::traits::ApiApplication;
use super::ProxyClient;

/// Client for the admin/vclusters endpoints
pub struct VirtualClusters<'a> {
    proxy: &'a ProxyClient,
}

impl ApiApplication for VirtualClusters<'_> {
    const APP_PATH: &'static str = api::VCLUSTERS;

    fn proxy(&self) -> &ProxyClient {
        self.proxy
    }
}

impl<'a> VirtualClusters<'a> {
    pub fn new(proxy: &'a ProxyClient) -> Self {
        Self { proxy }
    }

    /// List virtual clusters
    pub async fn list_vclusters(&self) -> Result<serde_json::Value> {
        let path = format!("{}/", self.base_path());
        debug!("list_vclusters path {}", path);

        let response = self.proxy.client().get(&path).await?;
        Ok(response.json().await?)
    }

    /// Create a token for a user of a vCluster.
    ///
    /// Path: `/admin/vclusters/<version>/vcluster/{vcluster}/username/{username}`.
    /// The username defaults to the vCluster name and the lifetime to one day.
    pub async fn create_vcluster_user_token(
        &self,
        vcluster: &str,
        username: Option<&str>,
        lifetime_in_seconds: Option<u64>,
    ) -> Result<TokenResponse> {
        let username = username.unwrap_or(vcluster);
        let payload = TokenRequest {
            life_time_seconds: lifetime_in_seconds
                .unwrap_or(defaults::VCLUSTER_TOKEN_LIFETIME_SECS),
        };
        let path = format!(
            "{}/vcluster/{}/username/{}",
            self.base_path(),
            urlencoding::encode(vcluster),
            urlencoding::encode(username)
        );
        debug!("create_vcluster_user_token path {}", path);

        let response = self.proxy.client().post(&path, &payload).await?;
        Ok(response.json().await?)
    }
}
