//! In-memory secret store with Secrets Manager stage semantics

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::config::rotation;
use crate::error::{ProxyError, Result};

use super::{SecretMetadata, SecretStore, SecretValue};

#[derive(Debug, Clone)]
struct StoredVersion {
    secret_string: String,
    stages: Vec<String>,
}

#[derive(Debug, Default)]
struct StoredSecret {
    versions: HashMap<String, StoredVersion>,
}

impl StoredSecret {
    fn holder_of(&self, stage: &str) -> Option<String> {
        self.versions
            .iter()
            .find(|(_, v)| v.stages.iter().any(|s| s == stage))
            .map(|(id, _)| id.clone())
    }

    fn detach(&mut self, stage: &str, version_id: &str) {
        if let Some(version) = self.versions.get_mut(version_id) {
            version.stages.retain(|s| s != stage);
        }
    }

    /// Attach `stage` to `version_id`; a stage lives on one version only.
    /// The version losing AWSCURRENT becomes AWSPREVIOUS.
    fn attach(&mut self, stage: &str, version_id: &str) {
        if let Some(previous) = self.holder_of(stage) {
            if previous == version_id {
                return;
            }
            self.detach(stage, &previous);
            if stage == rotation::STAGE_CURRENT {
                self.attach(rotation::STAGE_PREVIOUS, &previous);
            }
        }
        if let Some(version) = self.versions.get_mut(version_id) {
            version.stages.push(stage.to_string());
        }
    }
}

/// Secret store kept in process memory
///
/// Counts mutating calls so callers can assert that idempotent paths did not
/// write anything.
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    secrets: Mutex<HashMap<String, StoredSecret>>,
    mutations: AtomicUsize,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredSecret>> {
        self.secrets.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Create (or replace) a secret holding a single AWSCURRENT version
    pub fn insert_secret(&self, secret_id: &str, version_id: &str, secret_string: &str) {
        let mut secret = StoredSecret::default();
        secret.versions.insert(
            version_id.to_string(),
            StoredVersion {
                secret_string: secret_string.to_string(),
                stages: vec![rotation::STAGE_CURRENT.to_string()],
            },
        );
        self.lock().insert(secret_id.to_string(), secret);
    }

    /// Number of put/update calls received
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Number of versions stored for a secret
    pub fn version_count(&self, secret_id: &str) -> usize {
        self.lock()
            .get(secret_id)
            .map(|s| s.versions.len())
            .unwrap_or(0)
    }

    /// Value and stages of one version
    pub fn version(&self, secret_id: &str, version_id: &str) -> Option<(String, Vec<String>)> {
        self.lock()
            .get(secret_id)
            .and_then(|s| s.versions.get(version_id))
            .map(|v| (v.secret_string.clone(), v.stages.clone()))
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_secret_value(
        &self,
        secret_id: &str,
        version_id: Option<&str>,
        version_stage: Option<&str>,
    ) -> Result<SecretValue> {
        let secrets = self.lock();
        let secret = secrets
            .get(secret_id)
            .ok_or_else(|| ProxyError::SecretNotFound(secret_id.to_string()))?;

        let version_id = match version_id {
            Some(id) => id.to_string(),
            None => {
                let stage = version_stage.unwrap_or(rotation::STAGE_CURRENT);
                secret.holder_of(stage).ok_or_else(|| {
                    ProxyError::SecretNotFound(format!("{} stage {}", secret_id, stage))
                })?
            }
        };

        let version = secret.versions.get(&version_id).ok_or_else(|| {
            ProxyError::SecretNotFound(format!("{} version {}", secret_id, version_id))
        })?;
        if let Some(stage) = version_stage {
            if !version.stages.iter().any(|s| s == stage) {
                return Err(ProxyError::SecretNotFound(format!(
                    "{} version {} stage {}",
                    secret_id, version_id, stage
                )));
            }
        }

        Ok(SecretValue {
            secret_string: version.secret_string.clone(),
            version_id,
        })
    }

    async fn put_secret_value(
        &self,
        secret_id: &str,
        client_request_token: &str,
        secret_string: &str,
        stage: &str,
    ) -> Result<()> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut secrets = self.lock();
        let secret = secrets
            .get_mut(secret_id)
            .ok_or_else(|| ProxyError::SecretNotFound(secret_id.to_string()))?;

        if let Some(existing) = secret.versions.get(client_request_token) {
            // Same token and same content is accepted as a retry
            if existing.secret_string == secret_string
                && existing.stages.iter().any(|s| s == stage)
            {
                return Ok(());
            }
            return Err(ProxyError::SecretVersionExists(format!(
                "{} version {}",
                secret_id, client_request_token
            )));
        }

        secret.versions.insert(
            client_request_token.to_string(),
            StoredVersion {
                secret_string: secret_string.to_string(),
                stages: Vec::new(),
            },
        );
        secret.attach(stage, client_request_token);
        Ok(())
    }

    async fn describe_secret(&self, secret_id: &str) -> Result<SecretMetadata> {
        let secrets = self.lock();
        let secret = secrets
            .get(secret_id)
            .ok_or_else(|| ProxyError::SecretNotFound(secret_id.to_string()))?;

        Ok(SecretMetadata {
            version_ids_to_stages: secret
                .versions
                .iter()
                .map(|(id, v)| (id.clone(), v.stages.clone()))
                .collect(),
        })
    }

    async fn update_secret_version_stage(
        &self,
        secret_id: &str,
        stage: &str,
        move_to_version_id: &str,
        remove_from_version_id: Option<&str>,
    ) -> Result<()> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut secrets = self.lock();
        let secret = secrets
            .get_mut(secret_id)
            .ok_or_else(|| ProxyError::SecretNotFound(secret_id.to_string()))?;

        if !secret.versions.contains_key(move_to_version_id) {
            return Err(ProxyError::SecretStore(format!(
                "{} has no version {}",
                secret_id, move_to_version_id
            )));
        }

        if let Some(holder) = secret.holder_of(stage) {
            if holder != move_to_version_id && remove_from_version_id != Some(holder.as_str()) {
                return Err(ProxyError::SecretStore(format!(
                    "{} is attached to version {}; RemoveFromVersionId must name it",
                    stage, holder
                )));
            }
        }

        secret.attach(stage, move_to_version_id);
        Ok(())
    }
}
