//! Where replacement tokens come from
//!
//! Tokens are either minted against the proxy with the admin credentials, or
//! requested from a central rotation function that holds those credentials.

use async_trait::async_trait;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::Client as LambdaClient;
use log::{debug, error, info};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::{ProxyError, Result};
use crate::proxy::TokenResponse;
use crate::secrets::{sdk_config, SecretStore};

use super::admin::AdminCredentialResolver;
use super::claims::TokenIdentity;
use super::issuer::TokenIssuer;

/// Produces a new token for an identity
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn new_token(&self, identity: &TokenIdentity, lifetime_in_seconds: u64) -> Result<String>;
}

/// Mints tokens on the proxy with the admin credentials from a secret
pub struct IssuerTokenSource {
    admin_store: Arc<dyn SecretStore>,
    admin_secret_id: String,
    issuer: TokenIssuer,
}

impl IssuerTokenSource {
    pub fn new(
        admin_store: Arc<dyn SecretStore>,
        admin_secret_id: impl Into<String>,
        issuer: TokenIssuer,
    ) -> Self {
        Self {
            admin_store,
            admin_secret_id: admin_secret_id.into(),
            issuer,
        }
    }
}

#[async_trait]
impl TokenSource for IssuerTokenSource {
    async fn new_token(&self, identity: &TokenIdentity, lifetime_in_seconds: u64) -> Result<String> {
        let admin = AdminCredentialResolver::new(self.admin_store.as_ref())
            .resolve(&self.admin_secret_id)
            .await?;
        self.issuer.issue(&admin, identity, lifetime_in_seconds).await
    }
}

/// Asks a central rotation function for the token
pub struct FunctionTokenSource {
    client: LambdaClient,
    function_arn: String,
}

impl std::fmt::Debug for FunctionTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTokenSource")
            .field("function_arn", &self.function_arn)
            .finish_non_exhaustive()
    }
}

impl FunctionTokenSource {
    pub fn new(client: LambdaClient, function_arn: impl Into<String>) -> Self {
        Self {
            client,
            function_arn: function_arn.into(),
        }
    }

    /// Client from the default chain, through `role_arn` when given
    pub async fn from_env(function_arn: &str, role_arn: Option<&str>) -> Self {
        Self::new(LambdaClient::new(&sdk_config(role_arn).await), function_arn)
    }
}

/// Event sent to the rotation function, in its token-request shape
pub fn token_request_payload(identity: &TokenIdentity, lifetime_in_seconds: u64) -> Value {
    match identity {
        TokenIdentity::Tenant { name } => json!({
            "tenant": name,
            "expiry": lifetime_in_seconds,
        }),
        TokenIdentity::VirtualCluster { name, username } => json!({
            "vcluster": name,
            "username": username,
            "expiry": lifetime_in_seconds,
        }),
    }
}

/// Token out of the function's answer
pub fn token_from_response(function_error: Option<&str>, payload: &[u8]) -> Result<String> {
    if let Some(kind) = function_error {
        return Err(ProxyError::TokenFunction(format!(
            "{}: {}",
            kind,
            String::from_utf8_lossy(payload)
        )));
    }
    serde_json::from_slice::<TokenResponse>(payload)
        .map(|response| response.token)
        .map_err(|e| ProxyError::TokenFunction(format!("response has no token: {}", e)))
}

#[async_trait]
impl TokenSource for FunctionTokenSource {
    async fn new_token(&self, identity: &TokenIdentity, lifetime_in_seconds: u64) -> Result<String> {
        info!("Using function {} to get new token for {}", self.function_arn, identity);
        let body = serde_json::to_vec(&token_request_payload(identity, lifetime_in_seconds))?;

        let output = self
            .client
            .invoke()
            .function_name(&self.function_arn)
            .payload(Blob::new(body))
            .send()
            .await
            .map_err(|err| {
                ProxyError::TokenFunction(format!(
                    "Invoke failed for {}: {}",
                    self.function_arn,
                    DisplayErrorContext(&err)
                ))
            })?;
        debug!("Function answered with status {}", output.status_code());

        let payload: &[u8] = output.payload().map(|p| p.as_ref()).unwrap_or_default();
        token_from_response(output.function_error(), payload).map_err(|e| {
            error!("Failed to get a token from {}: {}", self.function_arn, e);
            e
        })
    }
}
