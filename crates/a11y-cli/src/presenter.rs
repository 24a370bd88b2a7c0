//! Terminal rendering of audits and history

use crate::console::{CliConsole, impact_label};
use a11y_core::{AuditError, AuditPhase, AuditPresenter};
use a11y_history::{AuditRecord, AuditSource, CheckerResults, impact_breakdown};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::time::Duration;

/// How much of the history to print when it is refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryView {
    /// One line with the number of stored audits
    Summary,
    /// Full listing, optionally limited to the most recent entries
    Full { limit: Option<usize> },
}

pub struct TerminalPresenter {
    console: CliConsole,
    history: HistoryView,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalPresenter {
    pub fn new(console: CliConsole, history: HistoryView) -> Self {
        Self {
            console,
            history,
            spinner: Mutex::new(None),
        }
    }

    fn set_status(&self, message: &str) {
        let mut spinner = self.spinner.lock();
        let bar = spinner.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.blue} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });
        bar.set_message(message.to_string());
    }

    fn stop_spinner(&self) {
        if let Some(bar) = self.spinner.lock().take() {
            bar.finish_and_clear();
        }
    }
}

impl AuditPresenter for TerminalPresenter {
    fn phase_changed(&self, phase: AuditPhase) {
        if phase.is_busy() {
            self.set_status(phase.status_message());
        } else {
            self.stop_spinner();
        }
    }

    fn show_results(&self, source: &AuditSource, results: &CheckerResults) {
        self.stop_spinner();
        self.console.print_header(&format!("Audit results for {}", source));

        if results.is_clean() {
            self.console.success("No accessibility violations found.");
            return;
        }

        println!(
            "{} violation{} found",
            results.violations.len().to_string().bold(),
            if results.violations.len() == 1 { "" } else { "s" }
        );
        for (impact, count) in impact_breakdown(&results.violations) {
            println!("  {:<10} {}", impact_label(impact.as_ref()), count);
        }

        for (index, violation) in results.violations.iter().enumerate() {
            let impact = impact_label(violation.impact.as_ref());
            println!();
            println!("{}. [{}] {}", index + 1, impact, violation.help.bold());
            println!("   {}", violation.description);

            let tags = violation.wcag_tags();
            if !tags.is_empty() {
                println!("   {} {}", "WCAG:".dimmed(), tags.join(", "));
            }
            if let Some(fix) = violation.remediation() {
                println!("   {} {}", "Fix:".dimmed(), fix);
            }
            if let Some(url) = &violation.help_url {
                println!("   {} {}", "Learn more:".dimmed(), url.cyan());
            }
            println!(
                "   {} {}",
                "Affected elements:".dimmed(),
                violation.nodes.len()
            );
            for node in &violation.nodes {
                println!("     {}", node.html.dimmed());
            }
        }
    }

    fn clear_results(&self) {
        self.stop_spinner();
    }

    fn show_history(&self, records: &[AuditRecord]) {
        self.stop_spinner();
        match self.history {
            HistoryView::Summary => {
                self.console
                    .info(&format!("{} audit(s) in history", records.len()));
            }
            HistoryView::Full { limit } => {
                self.console.print_header("Audit History");
                if records.is_empty() {
                    println!("{}", "No audits recorded yet.".dimmed());
                    return;
                }
                let shown = limit.unwrap_or(records.len()).min(records.len());
                for record in &records[..shown] {
                    print_history_entry(record);
                }
                if shown < records.len() {
                    println!(
                        "{}",
                        format!("... {} older audit(s) not shown", records.len() - shown).dimmed()
                    );
                }
            }
        }
    }

    fn show_error(&self, error: &AuditError) {
        self.stop_spinner();
        self.console.audit_error(error);
    }
}

fn print_history_entry(record: &AuditRecord) {
    println!(
        "{} {}  {}",
        format!("#{}", record.id).bold(),
        record.timestamp.dimmed(),
        record.source
    );
    let breakdown: Vec<String> = impact_breakdown(record.violations())
        .into_iter()
        .map(|(impact, count)| format!("{} {}", impact_label(impact.as_ref()), count))
        .collect();
    if breakdown.is_empty() {
        println!("    {}", "0 violations".green());
    } else {
        println!(
            "    {} violation(s): {}",
            record.violation_count,
            breakdown.join(", ")
        );
    }
}
