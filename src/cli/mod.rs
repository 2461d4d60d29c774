//! CLI argument parsing

mod common;
mod proxy;
mod rotation;

use clap::{Parser, Subcommand};

use crate::config::{api, defaults, env};

pub use common::OutputFormat;
pub use proxy::{
    AuthAction, CreateTenantTokenArgs, CreateVclusterTokenArgs, TenantsAction, VclustersAction,
};
pub use rotation::{HandleArgs, RotationAction, RotationArgs, StepArgs};

/// Conduktor Gateway admin CLI
#[derive(Parser, Debug)]
#[command(name = "cdkproxy")]
#[command(version)]
#[command(
    about = "Manage Conduktor Gateway tenants and vClusters, and rotate their tokens",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Proxy admin API URL (e.g. http://gateway:8888)
    #[arg(long, global = true, env = env::API_ENDPOINT)]
    pub url: Option<String>,

    /// Admin API username
    #[arg(short = 'u', long, global = true, env = env::API_USERNAME)]
    pub username: Option<String>,

    /// Admin API password
    #[arg(short = 'p', long, global = true, env = env::API_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Admin API version
    #[arg(long, global = true, env = env::API_VERSION, default_value = api::DEFAULT_VERSION)]
    pub api_version: String,

    /// Accept invalid TLS certificates
    #[arg(long, global = true, default_value_t = false)]
    pub ignore_ssl_errors: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Token issuance
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Tenants (multitenancy)
    #[command(visible_alias = "tenant")]
    Tenants {
        #[command(subcommand)]
        action: TenantsAction,
    },

    /// Virtual clusters
    #[command(visible_alias = "vcluster")]
    Vclusters {
        #[command(subcommand)]
        action: VclustersAction,
    },

    /// Secrets Manager token rotation
    Rotation {
        #[command(subcommand)]
        action: RotationAction,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["cdkproxy", "tenants", "list"]);
        assert_eq!(cli.log_level, defaults::LOG_LEVEL);
        assert_eq!(cli.output, OutputFormat::Yaml);
        assert!(!cli.ignore_ssl_errors);
        assert!(matches!(
            cli.command,
            Command::Tenants {
                action: TenantsAction::List
            }
        ));
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "cdkproxy",
            "vclusters",
            "ls",
            "--url",
            "http://gw:8888",
            "-u",
            "admin",
            "-p",
            "pw",
            "-o",
            "json",
            "--api-version",
            "v1beta1",
        ]);
        assert_eq!(cli.url.as_deref(), Some("http://gw:8888"));
        assert_eq!(cli.username.as_deref(), Some("admin"));
        assert_eq!(cli.password.as_deref(), Some("pw"));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.api_version, "v1beta1");
    }

    #[test]
    fn test_create_tenant_token_args() {
        let cli = Cli::parse_from([
            "cdkproxy",
            "auth",
            "create-tenant-token",
            "--tenant-name",
            "tenantA",
        ]);
        let Command::Auth {
            action: AuthAction::CreateTenantToken(args),
        } = cli.command
        else {
            panic!("expected auth create-tenant-token");
        };
        assert_eq!(args.tenant_name, "tenantA");
        assert_eq!(args.lifetime_in_seconds, defaults::CLI_TOKEN_LIFETIME_SECS);
    }

    #[test]
    fn test_create_vcluster_token_args() {
        let cli = Cli::parse_from([
            "cdkproxy",
            "vclusters",
            "create-token",
            "--vcluster",
            "vc1",
            "--username",
            "app",
            "--lifetime-in-seconds",
            "60",
        ]);
        let Command::Vclusters {
            action: VclustersAction::CreateToken(args),
        } = cli.command
        else {
            panic!("expected vclusters create-token");
        };
        assert_eq!(args.vcluster, "vc1");
        assert_eq!(args.username.as_deref(), Some("app"));
        assert_eq!(args.lifetime_in_seconds, 60);
    }

    #[test]
    fn test_rotation_step_args() {
        let cli = Cli::parse_from([
            "cdkproxy",
            "rotation",
            "step",
            "--secret-id",
            "s",
            "--request-token",
            "T1",
            "--step",
            "createSecret",
            "--admin-secret-arn",
            "arn:aws:secretsmanager:eu-west-1:1:secret:admin",
            "--token-lifetime-in-seconds",
            "120",
        ]);
        let Command::Rotation {
            action: RotationAction::Step(args),
        } = cli.command
        else {
            panic!("expected rotation step");
        };
        assert_eq!(args.secret_id, "s");
        assert_eq!(args.request_token, "T1");
        assert_eq!(args.step, "createSecret");
        assert_eq!(args.settings.token_lifetime_in_seconds, 120);
    }

    #[test]
    fn test_rotation_handle_reads_stdin_by_default() {
        let cli = Cli::parse_from(["cdkproxy", "rotation", "handle"]);
        let Command::Rotation {
            action: RotationAction::Handle(args),
        } = cli.command
        else {
            panic!("expected rotation handle");
        };
        assert_eq!(args.event, defaults::STDIN);
    }

    #[test]
    fn test_invalid_output_format() {
        let result = Cli::try_parse_from(["cdkproxy", "tenants", "list", "-o", "table"]);
        assert!(result.is_err());
    }
}
