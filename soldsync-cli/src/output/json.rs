//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use soldsync_core::{ItemId, ResultRecord};
use soldsync_fetch::{ProbeVerdict, ResolutionCounts, ResolveOutcome};
use std::path::Path;

use crate::commands::run::RunResult;
use crate::commands::scan::ScanResult;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for the run command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput<'a> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbox: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<CredentialOutput>,
    pub listings: usize,
    pub duplicates: usize,
    pub total_sold: u64,
    pub requests: u64,
    pub groups: usize,
    pub resolutions: ResolutionCounts,
    pub duration_ms: u128,
    pub records: &'a [ResultRecord],
}

/// Selected credential, without its token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialOutput {
    pub id: u32,
    pub owner: String,
}

/// JSON output for the scan command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutput<'a> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbox: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    pub matched: usize,
    pub duplicates: usize,
    pub items: &'a [ItemId],
}

/// JSON output for the probe command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutput {
    pub item: String,
    pub selected: Option<CredentialOutput>,
    pub attempts: Vec<ProbeAttemptOutput>,
}

/// One probed candidate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeAttemptOutput {
    pub credential: u32,
    pub owner: String,
    pub verdict: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u128,
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a run result.
    pub fn format_run(&self, result: &RunResult) -> Result<String> {
        let output = match result {
            RunResult::NothingToDo { inbox } => RunOutput {
                status: "empty",
                inbox: Some(display(inbox)),
                input: None,
                report: None,
                archived: None,
                credential: None,
                listings: 0,
                duplicates: 0,
                total_sold: 0,
                requests: 0,
                groups: 0,
                resolutions: ResolutionCounts::default(),
                duration_ms: 0,
                records: &[],
            },
            RunResult::Completed(summary) => RunOutput {
                status: "completed",
                inbox: None,
                input: Some(display(&summary.input)),
                report: Some(display(&summary.report)),
                archived: Some(display(&summary.archived)),
                credential: summary.credential.as_ref().map(|c| CredentialOutput {
                    id: c.id().0,
                    owner: c.owner().to_string(),
                }),
                listings: summary.unique.len(),
                duplicates: summary.unique.duplicates,
                total_sold: summary.batch.total_sold(),
                requests: summary.batch.requests,
                groups: summary.batch.groups,
                resolutions: summary.batch.counts,
                duration_ms: summary.batch.duration.as_millis(),
                records: &summary.batch.records,
            },
        };
        self.format(&output)
    }

    /// Formats a scan result.
    pub fn format_scan(&self, result: &ScanResult) -> Result<String> {
        let output = match result {
            ScanResult::Empty { inbox } => ScanOutput {
                status: "empty",
                inbox: Some(display(inbox)),
                input: None,
                matched: 0,
                duplicates: 0,
                items: &[],
            },
            ScanResult::Listings { input, unique } => ScanOutput {
                status: "listings",
                inbox: None,
                input: Some(display(input)),
                matched: unique.matched,
                duplicates: unique.duplicates,
                items: &unique.items,
            },
        };
        self.format(&output)
    }

    /// Formats a credential probe.
    pub fn format_probe(&self, outcome: &ResolveOutcome) -> Result<String> {
        let output = ProbeOutput {
            item: outcome.probe.to_string(),
            selected: outcome.selected.as_ref().map(|c| CredentialOutput {
                id: c.id().0,
                owner: c.owner().to_string(),
            }),
            attempts: outcome
                .attempts
                .iter()
                .map(|a| {
                    let (verdict, error) = match &a.verdict {
                        ProbeVerdict::Authorized => ("authorized", None),
                        ProbeVerdict::Unauthorized => ("unauthorized", None),
                        ProbeVerdict::NotFound => ("not_found", None),
                        ProbeVerdict::Failed(reason) => ("failed", Some(reason.clone())),
                    };
                    ProbeAttemptOutput {
                        credential: a.credential.0,
                        owner: a.owner.clone(),
                        verdict,
                        error,
                        duration_ms: a.duration.as_millis(),
                    }
                })
                .collect(),
        };
        self.format(&output)
    }
}
