//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands::{self, run::RunArgs};
use crate::console::CliConsole;
use a11y_core::AuditConfig;
use std::process::ExitCode;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: &AuditConfig) -> anyhow::Result<ExitCode> {
    let console = CliConsole::new(cli.verbose);

    match cli.command {
        Commands::Run {
            url,
            html,
            html_file,
        } => {
            commands::run::execute(
                config,
                console,
                RunArgs {
                    url,
                    html,
                    html_file,
                },
            )
            .await
        }
        Commands::History { limit } => commands::history::list(config, console, limit).await,
        Commands::Export { format, output } => {
            commands::history::export(config, console, format.into(), output).await
        }
        Commands::Import { path } => commands::history::import(config, console, &path).await,
        Commands::Clear { yes } => commands::history::clear(config, console, yes).await,
    }
}
