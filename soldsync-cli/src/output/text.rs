//! Text output formatting with colors.

use soldsync_fetch::{ProbeVerdict, ResolutionCounts, ResolveOutcome};
use std::time::Duration;

use crate::commands::run::{RunResult, RunSummary};
use crate::commands::scan::ScanResult;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats a run result.
    pub fn format_run(&self, result: &RunResult) -> String {
        match result {
            RunResult::NothingToDo { inbox } => {
                format!("{} {}", self.dim("No file to process in"), inbox.display())
            }
            RunResult::Completed(summary) => self.format_summary(summary),
        }
    }

    fn format_summary(&self, summary: &RunSummary) -> String {
        let batch = &summary.batch;
        let mut lines = vec![self.bold("SoldSync Run"), "─".repeat(40)];

        lines.push(format!("Input:      {}", summary.input.display()));
        lines.push(format!(
            "Listings:   {} {}",
            summary.unique.len(),
            self.dim(&format!("({} duplicates removed)", summary.unique.duplicates))
        ));

        match &summary.credential {
            Some(credential) => lines.push(format!("Account:    {}", self.cyan(&credential.to_string()))),
            None => lines.push(format!("Account:    {}", self.dim("none needed"))),
        }

        lines.push(format!("Sold total: {}", self.green(&batch.total_sold().to_string())));
        lines.push(format!("Resolved:   {}", self.format_counts(&batch.counts)));
        lines.push(format!(
            "Requests:   {} in {} group{} ({})",
            batch.requests,
            batch.groups,
            if batch.groups == 1 { "" } else { "s" },
            format_duration(batch.duration)
        ));
        lines.push(format!("Report:     {}", summary.report.display()));
        lines.push(format!("Archived:   {}", summary.archived.display()));

        lines.join("\n")
    }

    /// Formats resolution counters, highlighting failures.
    pub fn format_counts(&self, counts: &ResolutionCounts) -> String {
        let sold = self.green(&format!("{} sold", counts.sold));
        let failures = [
            (counts.not_found, "not found"),
            (counts.unauthorized, "unauthorized"),
            (counts.gave_up, "gave up"),
            (counts.failed, "failed"),
        ];

        let mut parts = vec![sold];
        for (count, label) in failures {
            let text = format!("{count} {label}");
            parts.push(if count == 0 { self.dim(&text) } else { self.yellow(&text) });
        }
        parts.join(", ")
    }

    /// Formats a scan result, one identifier per line.
    pub fn format_scan(&self, result: &ScanResult) -> String {
        match result {
            ScanResult::Empty { inbox } => {
                format!("{} {}", self.dim("No file to process in"), inbox.display())
            }
            ScanResult::Listings { input, unique } => {
                let mut lines = vec![format!(
                    "{}: {} listings {}",
                    self.bold(&input.display().to_string()),
                    unique.len(),
                    self.dim(&format!(
                        "({} matched, {} duplicates)",
                        unique.matched, unique.duplicates
                    ))
                )];
                lines.extend(unique.items.iter().map(ToString::to_string));
                lines.join("\n")
            }
        }
    }

    /// Formats a credential probe.
    pub fn format_probe(&self, outcome: &ResolveOutcome) -> String {
        let mut lines = vec![format!("Probe {}", self.bold(outcome.probe.as_str()))];

        for attempt in &outcome.attempts {
            let label = format!("{} (#{})", attempt.owner, attempt.credential);
            let verdict = match &attempt.verdict {
                ProbeVerdict::Authorized => self.green("✓ authorized"),
                ProbeVerdict::Unauthorized | ProbeVerdict::NotFound => {
                    self.red(&format!("✗ {}", attempt.verdict))
                }
                ProbeVerdict::Failed(_) => self.yellow(&format!("✗ {}", attempt.verdict)),
            };
            lines.push(format!(
                "  {:<20} {} {}",
                label,
                verdict,
                self.dim(&format_duration(attempt.duration))
            ));
        }

        match &outcome.selected {
            Some(credential) => lines.push(format!("Selected: {}", self.cyan(&credential.to_string()))),
            None => lines.push(self.red("No credential is authorized for this listing")),
        }

        lines.join("\n")
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Compact human duration: `850ms`, `12.3s`, `4m 10s`.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1_000 {
        format!("{millis}ms")
    } else if millis < 60_000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

// ============================================================================
// Tests
// ============================================================================
