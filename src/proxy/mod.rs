//! Proxy admin API client module
//!
//! `ApiClient` is the HTTP transport, `ProxyClient` pins the API version and
//! the resource clients (`AdminAuth`, `Multitenancy`, `VirtualClusters`) build
//! paths on top of it.

mod admin_auth;
mod client;
mod commands;
mod endpoint;
mod models;
mod multitenancy;
pub mod traits;
mod vclusters;

pub use admin_auth::AdminAuth;
pub use client::ApiClient;
pub use commands::{
    endpoint_from_cli, proxy_from_cli, run_auth_command, run_tenants_command,
    run_vclusters_command,
};
pub use endpoint::{ApiEndpoint, Protocol};
pub use models::{TokenRequest, TokenResponse};
pub use multitenancy::Multitenancy;
pub use traits::ApiApplication;
pub use vclusters::VirtualClusters;

use crate::config::api;

/// Admin API client bound to one API version
#[derive(Debug)]
pub struct ProxyClient {
    client: ApiClient,
    version: String,
}

impl ProxyClient {
    /// Wrap a transport with an explicit API version (e.g. "v1", "v1beta1")
    pub fn new(client: ApiClient, version: impl Into<String>) -> Self {
        Self {
            client,
            version: version.into(),
        }
    }

    /// Wrap a transport with the default API version
    pub fn with_default_version(client: ApiClient) -> Self {
        Self::new(client, api::DEFAULT_VERSION)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
impl ProxyClient {
    /// Create a test proxy client pointed at a mock server
    pub fn test_client(base_url: &str) -> Self {
        Self::with_default_version(ApiClient::test_client(base_url))
    }
}
