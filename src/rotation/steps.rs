//! Rotation state machine: createSecret, setSecret, testSecret, finishSecret

use log::{error, info, warn};
use std::str::FromStr;
use std::sync::Arc;

use crate::config::env;
use crate::config::rotation::{STAGE_CURRENT, STAGE_PENDING};
use crate::error::{ProxyError, Result};
use crate::secrets::SecretStore;

use super::claims::{decode_claims, TokenIdentity};
use super::issuer::TokenIssuer;
use super::record::CredentialRecord;
use super::settings::RotationSettings;
use super::source::{IssuerTokenSource, TokenSource};

/// One step of the Secrets Manager rotation protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStep {
    CreateSecret,
    SetSecret,
    TestSecret,
    FinishSecret,
}

impl RotationStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationStep::CreateSecret => "createSecret",
            RotationStep::SetSecret => "setSecret",
            RotationStep::TestSecret => "testSecret",
            RotationStep::FinishSecret => "finishSecret",
        }
    }
}

impl FromStr for RotationStep {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "createSecret" => Ok(RotationStep::CreateSecret),
            "setSecret" => Ok(RotationStep::SetSecret),
            "testSecret" => Ok(RotationStep::TestSecret),
            "finishSecret" => Ok(RotationStep::FinishSecret),
            other => Err(ProxyError::InvalidStep(other.to_string())),
        }
    }
}

impl std::fmt::Display for RotationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rotates proxy tokens held in a secret store
pub struct SecretRotation {
    store: Arc<dyn SecretStore>,
    tokens: Arc<dyn TokenSource>,
    token_lifetime_secs: u64,
}

impl SecretRotation {
    /// `store` holds the rotating secret, `tokens` mints the replacements
    pub fn new(store: Arc<dyn SecretStore>, tokens: Arc<dyn TokenSource>, token_lifetime_secs: u64) -> Self {
        Self {
            store,
            tokens,
            token_lifetime_secs,
        }
    }

    /// Rotation that mints tokens on the proxy itself. `admin_store` holds the
    /// admin credentials; it is `store` unless the admin secret sits behind a role.
    pub fn direct(
        store: Arc<dyn SecretStore>,
        admin_store: Arc<dyn SecretStore>,
        settings: &RotationSettings,
    ) -> Result<Self> {
        let endpoint = settings.endpoint.clone().ok_or_else(|| {
            ProxyError::Config(format!(
                "{} is not set and there is no {} to ask for tokens",
                env::API_ENDPOINT,
                env::TOKEN_FUNCTION
            ))
        })?;
        let issuer = TokenIssuer::new(endpoint, settings.api_version.clone(), settings.ignore_ssl_errors);
        let tokens = IssuerTokenSource::new(admin_store, settings.admin_secret_id.clone(), issuer);
        Ok(Self::new(store, Arc::new(tokens), settings.token_lifetime_secs))
    }

    /// Run a single step for `secret_id` and request token `token`
    pub async fn run_step(&self, secret_id: &str, token: &str, step: RotationStep) -> Result<()> {
        info!("{}: running for {} and version {}", step, secret_id, token);
        let result = match step {
            RotationStep::CreateSecret => self.create_secret(secret_id, token).await,
            RotationStep::SetSecret | RotationStep::TestSecret => Ok(()),
            RotationStep::FinishSecret => self.finish_secret(secret_id, token).await,
        };
        if let Err(e) = &result {
            error!("{} failed for {}: {}", step, secret_id, e);
        }
        result
    }

    /// New token for `identity` from the configured source
    pub async fn issue_token(&self, identity: &TokenIdentity, lifetime_in_seconds: u64) -> Result<String> {
        self.tokens.new_token(identity, lifetime_in_seconds).await
    }

    /// Write a pending version holding a freshly issued token
    pub async fn create_secret(&self, secret_id: &str, token: &str) -> Result<()> {
        let current = self
            .store
            .get_secret_value(secret_id, None, Some(STAGE_CURRENT))
            .await?;

        match self
            .store
            .get_secret_value(secret_id, Some(token), Some(STAGE_PENDING))
            .await
        {
            Ok(_) => {
                warn!(
                    "createSecret: pending version {} already exists for {}",
                    token, secret_id
                );
                return Ok(());
            }
            Err(ProxyError::SecretNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let record = CredentialRecord::parse(&current.secret_string);
        let claims = decode_claims(record.token()?)?;
        let identity = claims.identity()?;
        if let Some(expiry) = claims.expires_at() {
            info!("Current token for {} expires at {}", identity, expiry.to_rfc3339());
        }

        let new_token = self.issue_token(&identity, self.token_lifetime_secs).await?;
        if let Some(expiry) = decode_claims(&new_token).ok().and_then(|c| c.expires_at()) {
            info!("Token expiry was set to {}", expiry.to_rfc3339());
        }

        let rotated = record.rotate(identity.name(), &new_token)?;
        match self
            .store
            .put_secret_value(secret_id, token, &rotated.to_secret_string()?, STAGE_PENDING)
            .await
        {
            Ok(()) => {
                info!(
                    "createSecret: successfully put secret for {} and version {}",
                    secret_id, token
                );
                Ok(())
            }
            Err(ProxyError::SecretVersionExists(details)) => {
                warn!("createSecret: version already exists: {}", details);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Promote the request token's version to AWSCURRENT
    pub async fn finish_secret(&self, secret_id: &str, token: &str) -> Result<()> {
        let metadata = self.store.describe_secret(secret_id).await?;
        let current = metadata.version_with_stage(STAGE_CURRENT);

        if current == Some(token) {
            warn!(
                "finishSecret: version {} already marked as {} for {}",
                token, STAGE_CURRENT, secret_id
            );
            return Ok(());
        }

        self.store
            .update_secret_version_stage(secret_id, STAGE_CURRENT, token, current)
            .await?;
        info!(
            "finishSecret: successfully set {} stage to version {} for secret {}",
            STAGE_CURRENT, token, secret_id
        );
        Ok(())
    }
}
