//! cdkproxy - Main entry point

use clap::Parser;
use log::{debug, info};

use cdkproxy::{
    run_auth_command, run_rotation_command, run_tenants_command, run_vclusters_command, Cli,
    Command,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    info!("Starting cdkproxy v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        "CLI args: url={:?}, api_version={}, output={}, ignore_ssl_errors={}",
        cli.url, cli.api_version, cli.output, cli.ignore_ssl_errors
    );

    match &cli.command {
        Command::Auth { action } => run_auth_command(&cli, action).await?,
        Command::Tenants { action } => run_tenants_command(&cli, action).await?,
        Command::Vclusters { action } => run_vclusters_command(&cli, action).await?,
        Command::Rotation { action } => run_rotation_command(&cli, action).await?,
    }

    info!("Completed successfully");
    Ok(())
}
