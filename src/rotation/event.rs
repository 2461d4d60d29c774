//! Rotation trigger events

use log::info;
use serde::{Deserialize, Deserializer};

use crate::error::{ProxyError, Result};
use crate::proxy::TokenResponse;

use super::claims::TokenIdentity;
use super::steps::{RotationStep, SecretRotation};

/// Event delivered by the rotation trigger
///
/// Either a Secrets Manager rotation step, or an ad hoc request for a token.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RotationEvent {
    Step {
        #[serde(rename = "SecretId")]
        secret_id: String,
        #[serde(rename = "ClientRequestToken")]
        client_request_token: String,
        #[serde(rename = "Step")]
        step: String,
    },
    TokenRequest {
        #[serde(default)]
        tenant: Option<String>,
        #[serde(default)]
        vcluster: Option<String>,
        #[serde(default)]
        username: Option<String>,
        #[serde(deserialize_with = "lifetime_from_number_or_string")]
        expiry: u64,
    },
}

/// Token lifetimes arrive as JSON numbers or as numeric strings
fn lifetime_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lifetime {
        Number(u64),
        Text(String),
    }

    match Lifetime::deserialize(deserializer)? {
        Lifetime::Number(seconds) => Ok(seconds),
        Lifetime::Text(text) => text.trim().parse().map_err(|e| {
            serde::de::Error::custom(format!("invalid expiry '{}': {}", text, e))
        }),
    }
}

impl RotationEvent {
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| {
            ProxyError::Json(format!(
                "event is neither a rotation step nor a token request: {}",
                e
            ))
        })
    }
}

/// Identity targeted by an ad hoc token request
fn requested_identity(
    tenant: Option<&str>,
    vcluster: Option<&str>,
    username: Option<&str>,
) -> Result<TokenIdentity> {
    match (vcluster.filter(|v| !v.is_empty()), tenant.filter(|t| !t.is_empty())) {
        (Some(vcluster), _) => Ok(TokenIdentity::VirtualCluster {
            name: vcluster.to_string(),
            username: username.unwrap_or(vcluster).to_string(),
        }),
        (None, Some(tenant)) => Ok(TokenIdentity::Tenant {
            name: tenant.to_string(),
        }),
        (None, None) => Err(ProxyError::Config(
            "token request must name a tenant or a vcluster".to_string(),
        )),
    }
}

/// Dispatch an event. Token requests return the new token; steps return nothing.
pub async fn handle_event(
    rotation: &SecretRotation,
    event: &RotationEvent,
) -> Result<Option<TokenResponse>> {
    match event {
        RotationEvent::Step {
            secret_id,
            client_request_token,
            step,
        } => {
            let step: RotationStep = step.parse()?;
            rotation
                .run_step(secret_id, client_request_token, step)
                .await?;
            Ok(None)
        }
        RotationEvent::TokenRequest {
            tenant,
            vcluster,
            username,
            expiry,
        } => {
            let identity =
                requested_identity(tenant.as_deref(), vcluster.as_deref(), username.as_deref())?;
            info!("Token requested for {} with lifetime {}s", identity, expiry);
            let token = rotation.issue_token(&identity, *expiry).await?;
            Ok(Some(TokenResponse { token }))
        }
    }
}
