//! Command routing logic for CLI

use llmgate_core::{Gateway, load_from_env};

use crate::args::{Cli, Commands};
use crate::commands;
use crate::console::CliConsole;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    let console = CliConsole::new(cli.verbose);
    let config = load_from_env()?;

    if matches!(cli.command, Commands::Config) {
        commands::config::show(&config, &console);
        return Ok(());
    }

    let gateway = Gateway::from_config(config)?;

    match cli.command {
        Commands::Generate { request, details } => {
            commands::generate::run(&gateway, request.to_request(), details, &console).await
        }
        Commands::Stream { request } => {
            commands::stream::run(&gateway, request.to_request()).await
        }
        Commands::CheckLocal => commands::local::check(&gateway, &console).await,
        Commands::Config => Ok(()),
    }
}
