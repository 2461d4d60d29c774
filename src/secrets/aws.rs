//! AWS Secrets Manager backed secret store

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use log::debug;

use crate::config::rotation;
use crate::error::{ProxyError, Result};

use super::{SecretMetadata, SecretStore, SecretValue};

/// Secret store talking to AWS Secrets Manager
pub struct AwsSecretStore {
    client: SecretsManagerClient,
}

impl std::fmt::Debug for AwsSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretStore").finish_non_exhaustive()
    }
}

impl AwsSecretStore {
    pub fn new(client: SecretsManagerClient) -> Self {
        Self { client }
    }

    /// Client using the default credentials chain (env, profile, IMDS, ...)
    pub async fn from_env() -> Self {
        Self::new(SecretsManagerClient::new(&sdk_config(None).await))
    }

    /// Client using credentials obtained by assuming `role_arn`
    pub async fn assume_role(role_arn: &str) -> Self {
        Self::new(SecretsManagerClient::new(&sdk_config(Some(role_arn)).await))
    }
}

/// SDK configuration from the default chain, optionally through an assumed role
pub async fn sdk_config(role_arn: Option<&str>) -> SdkConfig {
    let base = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let Some(role_arn) = role_arn else {
        return base;
    };

    debug!("Assuming role {}", role_arn);
    let provider = aws_config::sts::AssumeRoleProvider::builder(role_arn)
        .session_name(rotation::ROLE_SESSION_NAME)
        .configure(&base)
        .build()
        .await;
    aws_config::defaults(BehaviorVersion::latest())
        .credentials_provider(provider)
        .load()
        .await
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn get_secret_value(
        &self,
        secret_id: &str,
        version_id: Option<&str>,
        version_stage: Option<&str>,
    ) -> Result<SecretValue> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .set_version_id(version_id.map(str::to_string))
            .set_version_stage(version_stage.map(str::to_string))
            .send()
            .await
            .map_err(|err| match err.as_service_error() {
                Some(e) if e.is_resource_not_found_exception() => {
                    ProxyError::SecretNotFound(secret_id.to_string())
                }
                _ => ProxyError::SecretStore(format!(
                    "GetSecretValue failed for {}: {}",
                    secret_id,
                    DisplayErrorContext(&err)
                )),
            })?;

        let secret_string = output.secret_string().ok_or_else(|| {
            ProxyError::SecretStore(format!("{} has no SecretString", secret_id))
        })?;

        Ok(SecretValue {
            secret_string: secret_string.to_string(),
            version_id: output.version_id().unwrap_or_default().to_string(),
        })
    }

    async fn put_secret_value(
        &self,
        secret_id: &str,
        client_request_token: &str,
        secret_string: &str,
        stage: &str,
    ) -> Result<()> {
        self.client
            .put_secret_value()
            .secret_id(secret_id)
            .client_request_token(client_request_token)
            .secret_string(secret_string)
            .version_stages(stage)
            .send()
            .await
            .map_err(|err| match err.as_service_error() {
                Some(e) if e.is_resource_exists_exception() => ProxyError::SecretVersionExists(
                    format!("{} version {}", secret_id, client_request_token),
                ),
                Some(e) if e.is_resource_not_found_exception() => {
                    ProxyError::SecretNotFound(secret_id.to_string())
                }
                _ => ProxyError::SecretStore(format!(
                    "PutSecretValue failed for {}: {}",
                    secret_id,
                    DisplayErrorContext(&err)
                )),
            })?;
        Ok(())
    }

    async fn describe_secret(&self, secret_id: &str) -> Result<SecretMetadata> {
        let output = self
            .client
            .describe_secret()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|err| match err.as_service_error() {
                Some(e) if e.is_resource_not_found_exception() => {
                    ProxyError::SecretNotFound(secret_id.to_string())
                }
                _ => ProxyError::SecretStore(format!(
                    "DescribeSecret failed for {}: {}",
                    secret_id,
                    DisplayErrorContext(&err)
                )),
            })?;

        Ok(SecretMetadata {
            version_ids_to_stages: output.version_ids_to_stages().cloned().unwrap_or_default(),
        })
    }

    async fn update_secret_version_stage(
        &self,
        secret_id: &str,
        stage: &str,
        move_to_version_id: &str,
        remove_from_version_id: Option<&str>,
    ) -> Result<()> {
        self.client
            .update_secret_version_stage()
            .secret_id(secret_id)
            .version_stage(stage)
            .move_to_version_id(move_to_version_id)
            .set_remove_from_version_id(remove_from_version_id.map(str::to_string))
            .send()
            .await
            .map_err(|err| {
                ProxyError::SecretStore(format!(
                    "UpdateSecretVersionStage failed for {}: {}",
                    secret_id,
                    DisplayErrorContext(&err)
                ))
            })?;
        Ok(())
    }
}
