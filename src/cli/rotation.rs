//! Rotation command definitions and arguments

use clap::{Args, Parser, Subcommand};

use crate::config::{defaults, env, rotation};

/// Actions for the 'rotation' command
#[derive(Subcommand, Debug)]
pub enum RotationAction {
    /// Dispatch a rotation trigger event read from a file or stdin
    Handle(HandleArgs),

    /// Run one rotation step
    Step(StepArgs),
}

/// Settings shared by rotation actions
#[derive(Args, Debug, Clone)]
pub struct RotationArgs {
    /// Secret holding the proxy admin credentials
    #[arg(long, env = env::ADMIN_SECRET_ARN)]
    pub admin_secret_arn: Option<String>,

    /// Role to assume to read the admin secret (ARN secrets only)
    #[arg(long, env = env::ADMIN_SECRET_ROLE_ARN)]
    pub admin_secret_role_arn: Option<String>,

    /// Rotation function that hands out tokens instead of the proxy
    #[arg(long, env = env::TOKEN_FUNCTION)]
    pub token_function_arn: Option<String>,

    /// Lifetime of the tokens minted during rotation
    #[arg(long, env = env::TOKEN_LIFETIME, default_value_t = rotation::DEFAULT_TOKEN_LIFETIME_SECS)]
    pub token_lifetime_in_seconds: u64,
}

/// Arguments for 'rotation handle'
#[derive(Parser, Debug)]
pub struct HandleArgs {
    /// JSON event file, or '-' for stdin
    #[arg(long, default_value = defaults::STDIN)]
    pub event: String,

    #[command(flatten)]
    pub settings: RotationArgs,
}

/// Arguments for 'rotation step'
#[derive(Parser, Debug)]
pub struct StepArgs {
    /// Secret being rotated
    #[arg(long)]
    pub secret_id: String,

    /// Version id of the rotation (ClientRequestToken)
    #[arg(long)]
    pub request_token: String,

    /// createSecret, setSecret, testSecret or finishSecret
    #[arg(long)]
    pub step: String,

    #[command(flatten)]
    pub settings: RotationArgs,
}
