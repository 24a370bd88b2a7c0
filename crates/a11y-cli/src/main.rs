//! Accessibility audit CLI
//!
//! Audits a URL or an HTML document with an external accessibility checker,
//! shows the violations grouped by impact, and keeps a local history of
//! every audit that can be listed, exported (JSON or CSV), imported and
//! cleared.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/a11y-cli
//! ```

mod args;
mod commands;
mod console;
mod logging;
mod presenter;
mod router;

use crate::args::Cli;
use crate::console::CliConsole;
use a11y_core::{AuditError, LoadedConfig, load_config};
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let console = CliConsole::new(cli.verbose);

    let LoadedConfig { mut config, source } = match load_config(cli.config_file.as_deref()) {
        Ok(loaded) => loaded,
        Err(error) => {
            console.audit_error(&error);
            return ExitCode::FAILURE;
        }
    };

    if cli.verbose {
        config.logging.raise_to_debug();
    }

    if let Err(e) = logging::init_logging(&config.logging) {
        console.warn(&format!("Logging disabled: {:#}", e));
    }
    match &source {
        Some(path) => tracing::debug!("Configuration loaded from {:?}", path),
        None => tracing::debug!("No configuration file found; using defaults"),
    }

    match router::route(cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<AuditError>() {
                Some(error) => console.audit_error(error),
                None => console.error(&format!("{:#}", e)),
            }
            ExitCode::FAILURE
        }
    }
}
