//! CLI command implementations.

pub mod config;
pub mod probe;
pub mod run;
pub mod scan;

use anyhow::{Context, Result};
use soldsync_core::{Credential, ItemId, ListingFilter, ListingRow, UniqueItems};
use soldsync_fetch::FetchContext;
use soldsync_store::{AppConfig, CredentialStore, workbook};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::Cli;

/// Number of identifiers echoed to the log after filtering.
const LOGGED_PREVIEW: usize = 10;

/// Configuration file the CLI reads.
pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(AppConfig::discover)
}

/// Loads the configuration and applies command-line overrides.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = config_path(cli);
    let mut config = AppConfig::load_from(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(dir) = &cli.inbox {
        config.paths.inbox.clone_from(dir);
    }
    if let Some(dir) = &cli.ready {
        config.paths.ready.clone_from(dir);
    }
    if let Some(dir) = &cli.done {
        config.paths.done.clone_from(dir);
    }
    if let Some(size) = cli.batch_size {
        config.batch_size = size.get();
    }
}

/// Reads the listings sheet and returns the unique identifiers to fetch.
pub fn read_listings(path: &Path, config: &AppConfig) -> Result<UniqueItems> {
    let cells = workbook::read_rows(path, &config.worksheet)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let rows: Vec<ListingRow> = cells.iter().map(|row| config.columns.row(row)).collect();
    let unique = ListingFilter::new(config.status_sentinel.as_str()).apply(&rows);

    info!(
        rows = rows.len(),
        matched = unique.matched,
        unique = unique.len(),
        duplicates = unique.duplicates,
        "Filtered listings"
    );
    info!(
        first = ?unique.items.iter().take(LOGGED_PREVIEW).map(ItemId::as_str).collect::<Vec<_>>(),
        "Listings to fetch"
    );
    Ok(unique)
}

/// Loads the candidate credentials named in the configuration.
pub fn load_credentials(config: &AppConfig) -> Result<Vec<Credential>> {
    CredentialStore::new(&config.db_api.path)
        .load(&config.credential_ids, &config.owners)
        .with_context(|| format!("Failed to load credentials from {}", config.db_api.path.display()))
}

/// Builds the fetch context against the configured marketplace API.
pub fn fetch_context(config: &AppConfig) -> Result<FetchContext> {
    let batch_size =
        NonZeroUsize::new(config.batch_size).context("batch_size must be at least 1")?;

    FetchContext::builder()
        .batch_size(batch_size)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .api_base(config.api_base.as_str())
        .build()
        .context("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_overrides_replace_paths_and_batch_size() {
        let cli = Cli::try_parse_from([
            "soldsync", "--inbox", "/in", "--done", "/done", "--batch-size", "7",
        ])
        .unwrap();
        let mut config = AppConfig::default();

        apply_overrides(&mut config, &cli);

        assert_eq!(config.paths.inbox, PathBuf::from("/in"));
        assert_eq!(config.paths.ready, PathBuf::from("./XLSX_PRONTO"));
        assert_eq!(config.paths.done, PathBuf::from("/done"));
        assert_eq!(config.batch_size, 7);
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let cli = Cli::try_parse_from(["soldsync", "--config", "/etc/soldsync.json"]).unwrap();
        assert_eq!(config_path(&cli), PathBuf::from("/etc/soldsync.json"));
    }

    #[test]
    fn test_missing_config_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("creds.json");
        let cli = Cli::try_parse_from(["soldsync", "--config", path.to_str().unwrap()]).unwrap();

        let err = load_config(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("Configuration file not found"));
    }

    #[test]
    fn test_fetch_context_uses_config() {
        let mut config = AppConfig::default();
        config.batch_size = 12;
        let ctx = fetch_context(&config).unwrap();
        assert_eq!(ctx.settings.batch_size.get(), 12);
        assert_eq!(ctx.settings.timeout, Duration::from_secs(30));
    }
}
