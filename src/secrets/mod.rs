//! Secret store abstraction used by the rotation workflow
//!
//! The rotation only ever needs four calls: read a version, write a pending
//! version, list version stages, and move a stage. `AwsSecretStore` talks to
//! AWS Secrets Manager; `InMemorySecretStore` mirrors its stage semantics for
//! tests and dry runs.

mod aws;
mod memory;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;

pub use aws::{sdk_config, AwsSecretStore};
pub use memory::InMemorySecretStore;

/// One version of a secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretValue {
    pub secret_string: String,
    pub version_id: String,
}

/// Version bookkeeping of a secret
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretMetadata {
    pub version_ids_to_stages: HashMap<String, Vec<String>>,
}

impl SecretMetadata {
    /// Version currently holding `stage`, if any
    pub fn version_with_stage(&self, stage: &str) -> Option<&str> {
        self.version_ids_to_stages
            .iter()
            .find(|(_, stages)| stages.iter().any(|s| s == stage))
            .map(|(version, _)| version.as_str())
    }
}

/// Minimal secret store interface
///
/// Implementations return `ProxyError::SecretNotFound` when the secret, or the
/// requested version/stage of it, does not exist, and
/// `ProxyError::SecretVersionExists` when a put reuses a request token.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Read a secret string, optionally pinned to a version id and/or stage
    async fn get_secret_value(
        &self,
        secret_id: &str,
        version_id: Option<&str>,
        version_stage: Option<&str>,
    ) -> Result<SecretValue>;

    /// Store a new version identified by `client_request_token` under `stage`
    async fn put_secret_value(
        &self,
        secret_id: &str,
        client_request_token: &str,
        secret_string: &str,
        stage: &str,
    ) -> Result<()>;

    /// List versions and their stages
    async fn describe_secret(&self, secret_id: &str) -> Result<SecretMetadata>;

    /// Attach `stage` to `move_to_version_id`, removing it from `remove_from_version_id`
    async fn update_secret_version_stage(
        &self,
        secret_id: &str,
        stage: &str,
        move_to_version_id: &str,
        remove_from_version_id: Option<&str>,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_with_stage() {
        let mut metadata = SecretMetadata::default();
        metadata
            .version_ids_to_stages
            .insert("v1".into(), vec!["AWSPREVIOUS".into()]);
        metadata
            .version_ids_to_stages
            .insert("v2".into(), vec!["AWSCURRENT".into()]);

        assert_eq!(metadata.version_with_stage("AWSCURRENT"), Some("v2"));
        assert_eq!(metadata.version_with_stage("AWSPREVIOUS"), Some("v1"));
        assert_eq!(metadata.version_with_stage("AWSPENDING"), None);
    }
}
