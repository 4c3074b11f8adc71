//! Scan command - show what a run would fetch, without side effects.

use anyhow::{Context, Result};
use soldsync_core::UniqueItems;
use soldsync_store::{AppConfig, InboxScan, inbox};
use std::path::PathBuf;

use super::{load_config, read_listings};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Result of scanning the inbox.
#[derive(Debug)]
pub enum ScanResult {
    /// The inbox was empty.
    Empty {
        /// Inbox that was scanned.
        inbox: PathBuf,
    },
    /// The inbox workbook and the identifiers it yields.
    Listings {
        /// Inbox workbook.
        input: PathBuf,
        /// Filtered, deduplicated identifiers.
        unique: UniqueItems,
    },
}

/// Runs the scan command.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let result = scan(&config).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_scan(&result));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_scan(&result)?);
        }
    }
    Ok(())
}

/// Reads and filters the inbox workbook.
pub async fn scan(config: &AppConfig) -> Result<ScanResult> {
    let scanned = inbox::scan(&config.paths.inbox)
        .await
        .with_context(|| format!("Failed to scan inbox {}", config.paths.inbox.display()))?;

    match scanned {
        InboxScan::Empty => Ok(ScanResult::Empty {
            inbox: config.paths.inbox.clone(),
        }),
        InboxScan::Single(input) => {
            let unique = read_listings(&input, config)?;
            Ok(ScanResult::Listings { input, unique })
        }
    }
}
