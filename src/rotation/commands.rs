//! Rotation command handlers

use log::{debug, info};
use std::io::Read;
use std::sync::Arc;

use crate::cli::{Cli, RotationAction, RotationArgs};
use crate::config::defaults;
use crate::error::Result;
use crate::output::output_value;
use crate::proxy::endpoint_from_cli;
use crate::secrets::{AwsSecretStore, SecretStore};

use super::admin::needs_assumed_role;
use super::event::{handle_event, RotationEvent};
use super::settings::RotationSettings;
use super::source::FunctionTokenSource;
use super::steps::SecretRotation;

/// Read an event from a file, or stdin for '-'
pub fn read_event(source: &str) -> Result<RotationEvent> {
    let payload = if source == defaults::STDIN {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        debug!("Reading event from {}", source);
        std::fs::read_to_string(source)?
    };
    RotationEvent::from_json(&payload)
}

/// Rotation settings from the global options and the rotation flags.
/// The proxy URL may be left out when a token function is configured.
pub fn settings_from_cli(cli: &Cli, args: &RotationArgs) -> Result<RotationSettings> {
    let token_function = args.token_function_arn.clone().filter(|f| !f.is_empty());
    let endpoint = match (&cli.url, &token_function) {
        (None, Some(_)) => None,
        _ => Some(endpoint_from_cli(cli)?),
    };
    Ok(
        RotationSettings::new(endpoint, args.admin_secret_arn.clone().unwrap_or_default())
            .with_token_function(token_function)
            .with_admin_secret_role(args.admin_secret_role_arn.clone())
            .with_token_lifetime(args.token_lifetime_in_seconds)
            .with_api_version(cli.api_version.clone())
            .with_ignore_ssl_errors(cli.ignore_ssl_errors),
    )
}

/// Secrets Manager backed rotation.
///
/// With a token function the tokens come from that function, invoked through
/// the admin secret role when one is set. Otherwise tokens are minted on the
/// proxy and the admin secret is read through the role when it lives behind
/// an ARN.
pub async fn aws_rotation(settings: &RotationSettings) -> Result<SecretRotation> {
    let store: Arc<dyn SecretStore> = Arc::new(AwsSecretStore::from_env().await);

    if let Some(function_arn) = settings.token_function_arn.as_deref() {
        info!("Delegating token creation to {}", function_arn);
        let tokens =
            FunctionTokenSource::from_env(function_arn, settings.admin_secret_role.as_deref()).await;
        return Ok(SecretRotation::new(store, Arc::new(tokens), settings.token_lifetime_secs));
    }

    let admin_store: Arc<dyn SecretStore> = match settings.admin_secret_role.as_deref() {
        Some(role) if needs_assumed_role(&settings.admin_secret_id, Some(role)) => {
            info!("Reading admin secret with role {}", role);
            Arc::new(AwsSecretStore::assume_role(role).await)
        }
        _ => store.clone(),
    };
    SecretRotation::direct(store, admin_store, settings)
}

/// Run a 'rotation' action
pub async fn run_rotation_command(cli: &Cli, action: &RotationAction) -> Result<()> {
    let (event, args) = match action {
        RotationAction::Handle(args) => (read_event(&args.event)?, &args.settings),
        RotationAction::Step(args) => (
            RotationEvent::Step {
                secret_id: args.secret_id.clone(),
                client_request_token: args.request_token.clone(),
                step: args.step.clone(),
            },
            &args.settings,
        ),
    };

    let settings = settings_from_cli(cli, args)?;
    let rotation = aws_rotation(&settings).await?;

    if let Some(token) = handle_event(&rotation, &event).await? {
        output_value(&token, &cli.output)?;
    }
    Ok(())
}
