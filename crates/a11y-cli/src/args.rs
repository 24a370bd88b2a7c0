//! CLI argument definitions using clap
//!
//! - a11y-audit run --url <URL>         # Audit a live page
//! - a11y-audit run --html-file <PATH>  # Audit a saved document
//! - a11y-audit history                 # Show past audits
//! - a11y-audit export/import/clear     # Manage history

use a11y_history::ExportFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "a11y-audit")]
#[command(about = "Audit web pages and HTML for accessibility violations")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (JSON, TOML or YAML); defaults to
    /// ./a11y_audit.{toml,yaml,yml,json} or ~/.a11y-audit/config.toml
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit a URL or a piece of HTML
    Run {
        /// Page to fetch and audit
        #[arg(long, default_value = "")]
        url: String,

        /// HTML to audit directly
        #[arg(long, default_value = "", conflicts_with = "html_file")]
        html: String,

        /// File containing HTML to audit
        #[arg(long)]
        html_file: Option<PathBuf>,
    },

    /// Show past audits, most recent first
    History {
        /// Show at most this many audits
        #[arg(long, short)]
        limit: Option<usize>,
    },

    /// Export the audit history
    Export {
        /// Output format
        #[arg(long, short, value_enum, default_value = "json")]
        format: FormatArg,

        /// Destination file; `-` writes to stdout. Defaults to
        /// a11y-audit-history.<format> in the current directory
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import audits from a JSON export
    Import {
        /// JSON file produced by `export --format json`
        path: PathBuf,
    },

    /// Delete every stored audit
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}
