//! cdkproxy - Conduktor Gateway admin API client
//!
//! A client and CLI for the proxy admin API, plus the AWS Secrets Manager
//! rotation workflow that keeps tenant and vCluster tokens fresh.
//!
//! # Features
//!
//! - Issue tenant and vCluster user tokens
//! - List tenants and virtual clusters
//! - Rotate proxy tokens stored in Secrets Manager (bare or SASL records)
//! - JSON or YAML output
//!
//! # Example
//!
//! ```bash
//! # Create a token for a tenant
//! cdkproxy --url http://gateway:8888 -u admin -p secret \
//!     auth create-tenant-token --tenant-name tenantA
//!
//! # List virtual clusters as JSON
//! cdkproxy vclusters list -o json
//!
//! # Run a rotation step
//! cdkproxy rotation step --secret-id my-secret --request-token T1 --step createSecret
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod proxy;
pub mod rotation;
pub mod secrets;

pub use cli::{Cli, Command, OutputFormat};
pub use error::{ProxyError, Result};
pub use proxy::{
    run_auth_command, run_tenants_command, run_vclusters_command, AdminAuth, ApiClient,
    ApiEndpoint, Multitenancy, ProxyClient, VirtualClusters,
};
pub use rotation::{
    handle_event, run_rotation_command, CredentialRecord, RotationEvent, RotationSettings,
    RotationStep, SecretRotation,
};
pub use secrets::{AwsSecretStore, InMemorySecretStore, SecretStore};
