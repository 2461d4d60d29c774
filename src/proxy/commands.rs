//! Admin API command handlers

use log::debug;

use crate::cli::{AuthAction, Cli, TenantsAction, VclustersAction};
use crate::config::env;
use crate::error::{ProxyError, Result};
use crate::output::output_value;

use super::{AdminAuth, ApiClient, ApiEndpoint, Multitenancy, ProxyClient, VirtualClusters};

/// Endpoint from `--url` / CDK_API_ENDPOINT
pub fn endpoint_from_cli(cli: &Cli) -> Result<ApiEndpoint> {
    let url = cli.url.as_deref().ok_or_else(|| {
        ProxyError::Config(format!(
            "The proxy URL is required (--url or {})",
            env::API_ENDPOINT
        ))
    })?;
    ApiEndpoint::from_url(url)
}

/// Authenticated admin API client from the global CLI options
pub fn proxy_from_cli(cli: &Cli) -> Result<ProxyClient> {
    let endpoint = endpoint_from_cli(cli)?;
    debug!("Using proxy admin API at {} ({})", endpoint, cli.api_version);
    let client = ApiClient::new(
        endpoint,
        cli.username.clone(),
        cli.password.clone(),
        cli.ignore_ssl_errors,
    )?;
    Ok(ProxyClient::new(client, cli.api_version.clone()))
}

/// Run an 'auth' action
pub async fn run_auth_command(cli: &Cli, action: &AuthAction) -> Result<()> {
    let proxy = proxy_from_cli(cli)?;
    match action {
        AuthAction::CreateTenantToken(args) => {
            debug!("Creating token for tenant {}", args.tenant_name);
            let token = AdminAuth::new(&proxy)
                .create_tenant_credentials(&args.tenant_name, Some(args.lifetime_in_seconds))
                .await?;
            output_value(&token, &cli.output)
        }
    }
}

/// Run a 'tenants' action
pub async fn run_tenants_command(cli: &Cli, action: &TenantsAction) -> Result<()> {
    let proxy = proxy_from_cli(cli)?;
    match action {
        TenantsAction::List => {
            let tenants = Multitenancy::new(&proxy).list_tenants().await?;
            output_value(&tenants, &cli.output)
        }
    }
}

/// Run a 'vclusters' action
pub async fn run_vclusters_command(cli: &Cli, action: &VclustersAction) -> Result<()> {
    let proxy = proxy_from_cli(cli)?;
    let vclusters = VirtualClusters::new(&proxy);
    match action {
        VclustersAction::List => {
            let listing = vclusters.list_vclusters().await?;
            output_value(&listing, &cli.output)
        }
        VclustersAction::CreateToken(args) => {
            debug!("Creating token for vcluster {}", args.vcluster);
            let token = vclusters
                .create_vcluster_user_token(
                    &args.vcluster,
                    args.username.as_deref(),
                    Some(args.lifetime_in_seconds),
                )
                .await?;
            output_value(&token, &cli.output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("cdkproxy").chain(args.iter().copied()))
    }

    #[test]
    fn test_proxy_from_cli() {
        let cli = cli(&[
            "tenants",
            "list",
            "--url",
            "gw:8888/",
            "--api-version",
            "v1beta1",
        ]);
        let proxy = proxy_from_cli(&cli).unwrap();
        assert_eq!(proxy.client().endpoint().as_str(), "http://gw:8888");
        assert_eq!(proxy.version(), "v1beta1");
    }

    #[test]
    fn test_username_without_password() {
        let mut cli = cli(&["tenants", "list", "--url", "http://gw", "-u", "admin"]);
        cli.password = None;
        let err = proxy_from_cli(&cli).unwrap_err();
        assert!(matches!(err, ProxyError::Config(_)));
    }

    #[tokio::test]
    async fn test_run_tenants_list() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/multitenancy/v1/tenants"))
            .and(basic_auth("admin", "pw"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["tenantA"])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let cli = cli(&["tenants", "list", "--url", &uri, "-u", "admin", "-p", "pw"]);
        run_tenants_command(&cli, &TenantsAction::List).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_create_tenant_token() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/auth/v1/tenants/tenantA"))
            .and(body_json(json!({"lifeTimeSeconds": 86400})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let cli = cli(&[
            "auth",
            "create-tenant-token",
            "--tenant-name",
            "tenantA",
            "--url",
            &uri,
            "-u",
            "admin",
            "-p",
            "pw",
        ]);
        let crate::cli::Command::Auth { action } = &cli.command else {
            panic!("expected auth command");
        };
        run_auth_command(&cli, action).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_vclusters_create_token_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/vclusters/v1/vcluster/vc1/username/vc1"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({"detail": "exists"})))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let cli = cli(&[
            "vclusters",
            "create-token",
            "--vcluster",
            "vc1",
            "--url",
            &uri,
            "-u",
            "admin",
            "-p",
            "pw",
        ]);
        let crate::cli::Command::Vclusters { action } = &cli.command else {
            panic!("expected vclusters command");
        };
        let err = run_vclusters_command(&cli, action).await.unwrap_err();
        assert!(matches!(err, ProxyError::Conflict { status: 409, .. }));
    }
}
