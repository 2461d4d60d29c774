//! Credential rotation for proxy tokens
//!
//! Implements the four-step Secrets Manager rotation protocol. The rotating
//! secret holds a proxy JWT, bare or inside a map of SASL fields; rotation
//! decodes it to find the tenant or vCluster it was issued for, gets a
//! replacement (from the proxy with admin credentials, or from a central
//! rotation function), stages it as `AWSPENDING` and later promotes it to
//! `AWSCURRENT`.

mod admin;
mod claims;
mod commands;
mod event;
mod issuer;
mod record;
mod settings;
mod source;
mod steps;

pub use admin::{needs_assumed_role, parse_admin_credentials, AdminCredentialResolver, AdminCredentials};
pub use claims::{decode_claims, TokenClaims, TokenIdentity};
pub use commands::{aws_rotation, read_event, run_rotation_command, settings_from_cli};
pub use event::{handle_event, RotationEvent};
pub use issuer::TokenIssuer;
pub use record::{replace_in_values, CredentialRecord};
pub use settings::RotationSettings;
pub use source::{token_from_response, token_request_payload, FunctionTokenSource, IssuerTokenSource, TokenSource};
pub use steps::{RotationStep, SecretRotation};
