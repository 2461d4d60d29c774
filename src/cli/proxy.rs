//! Admin API command definitions and arguments

use clap::{Parser, Subcommand};

use crate::config::defaults;

/// Actions for the 'auth' command
#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Create a token for a tenant
    CreateTenantToken(CreateTenantTokenArgs),
}

/// Arguments for 'auth create-tenant-token'
#[derive(Parser, Debug)]
pub struct CreateTenantTokenArgs {
    /// Tenant to issue the token for
    #[arg(long)]
    pub tenant_name: String,

    /// Token lifetime in seconds
    #[arg(long, default_value_t = defaults::CLI_TOKEN_LIFETIME_SECS)]
    pub lifetime_in_seconds: u64,
}

/// Actions for the 'tenants' command
#[derive(Subcommand, Debug)]
pub enum TenantsAction {
    /// List tenants
    #[command(visible_alias = "ls")]
    List,
}

/// Actions for the 'vclusters' command
#[derive(Subcommand, Debug)]
pub enum VclustersAction {
    /// List virtual clusters
    #[command(visible_alias = "ls")]
    List,

    /// Create a token for a vCluster user
    CreateToken(CreateVclusterTokenArgs),
}

/// Arguments for 'vclusters create-token'
#[derive(Parser, Debug)]
pub struct CreateVclusterTokenArgs {
    /// Virtual cluster name
    #[arg(long)]
    pub vcluster: String,

    /// Username (defaults to the vCluster name)
    #[arg(long)]
    pub username: Option<String>,

    /// Token lifetime in seconds
    #[arg(long, default_value_t = defaults::CLI_TOKEN_LIFETIME_SECS)]
    pub lifetime_in_seconds: u64,
}
