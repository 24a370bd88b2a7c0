//! CLI console utilities

use a11y_core::{AuditError, UserFriendlyError};
use a11y_history::Impact;
use colored::*;

/// CLI console for formatted output
#[derive(Debug, Clone, Copy)]
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            eprintln!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print an audit error with its category, title and suggestions
    pub fn audit_error(&self, error: &AuditError) {
        let friendly = UserFriendlyError::from(error);
        let text = friendly.format_display();
        let (headline, details) = text.split_once("\n\n").unwrap_or((text.as_str(), ""));
        self.error(headline);
        for line in details.lines().filter(|line| !line.is_empty()) {
            eprintln!("  {}", line.dimmed());
        }
        if error.is_retryable() {
            eprintln!("  {}", "This may be temporary; try again.".dimmed());
        }
        if self.verbose {
            eprintln!("  {}", format!("[{}]", friendly.error_code).dimmed());
        }
    }

    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.chars().count()).dimmed());
    }
}

/// Impact label colored by severity; `N/A` when the checker gave none
pub fn impact_label(impact: Option<&Impact>) -> ColoredString {
    let Some(impact) = impact else {
        return "N/A".dimmed();
    };
    let label = impact.label();
    match impact {
        Impact::Critical => label.red().bold(),
        Impact::Serious => label.red(),
        Impact::Moderate => label.yellow(),
        Impact::Minor => label.blue(),
        Impact::Other(_) => label.dimmed(),
    }
}
