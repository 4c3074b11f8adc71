//! Run command - process the inbox workbook end to end.

use anyhow::{Context, Result, bail};
use soldsync_core::{Credential, UniqueItems};
use soldsync_fetch::{BatchReport, FetchContext};
use soldsync_store::{AppConfig, InboxScan, inbox, workbook};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

use super::{fetch_context, load_config, load_credentials, read_listings};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Result of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    /// Workbook that was processed.
    pub input: PathBuf,
    /// Identifiers that passed the filter.
    pub unique: UniqueItems,
    /// Credential used for the batch, if any listing needed fetching.
    pub credential: Option<Credential>,
    /// Pipeline counters and records.
    pub batch: BatchReport,
    /// Written report.
    pub report: PathBuf,
    /// Where the input was moved.
    pub archived: PathBuf,
}

/// What a run did.
#[derive(Debug)]
pub enum RunResult {
    /// The inbox was empty.
    NothingToDo {
        /// Inbox that was scanned.
        inbox: PathBuf,
    },
    /// The inbox workbook was processed.
    Completed(Box<RunSummary>),
}

/// Runs the run command.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let ctx = fetch_context(&config)?;

    let result = execute(&config, &ctx).await?;
    output_result(&result, cli)
}

/// Processes the inbox with the given configuration and fetch context.
///
/// Every failure before the batch starts is fatal and leaves the inbox
/// untouched.
#[instrument(skip_all, fields(inbox = %config.paths.inbox.display()))]
pub async fn execute(config: &AppConfig, ctx: &FetchContext) -> Result<RunResult> {
    let input = match inbox::scan(&config.paths.inbox)
        .await
        .with_context(|| format!("Failed to scan inbox {}", config.paths.inbox.display()))?
    {
        InboxScan::Empty => {
            info!("No file to process");
            return Ok(RunResult::NothingToDo {
                inbox: config.paths.inbox.clone(),
            });
        }
        InboxScan::Single(path) => path,
    };

    let credentials = load_credentials(config)?;
    let unique = read_listings(&input, config)?;

    let (credential, batch) = match unique.first() {
        None => {
            warn!("No listing passed the filter, writing an empty report");
            (None, BatchReport::default())
        }
        Some(probe) => {
            let outcome = ctx.resolver().resolve_detailed(&credentials, probe).await;
            let Some(credential) = outcome.selected else {
                bail!("No credential is authorized for listing {probe}");
            };
            info!(credential = %credential, "Using credential");

            let batch = ctx.pipeline().run(&unique.items, &credential).await;
            (Some(credential), batch)
        }
    };

    let report = workbook::write_report(&config.paths.ready, &batch.records)
        .with_context(|| format!("Failed to write report into {}", config.paths.ready.display()))?;
    info!(report = %report.display(), records = batch.records.len(), "Report written");

    let archived = inbox::archive(&input, &config.paths.done)
        .await
        .context("Failed to archive input workbook")?;

    Ok(RunResult::Completed(Box::new(RunSummary {
        input,
        unique,
        credential,
        batch,
        report,
        archived,
    })))
}

fn output_result(result: &RunResult, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_run(result));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_run(result)?);
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_xlsxwriter::Workbook;
    use soldsync_core::{CredentialId, ItemId};
    use soldsync_fetch::{FetchError, ItemApi, ItemRecord, Sleeper};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Owner 2 sees every listing; the sold quantity is the numeric suffix.
    #[derive(Default)]
    struct OwnerApi {
        calls: Mutex<Vec<(CredentialId, String)>>,
    }

    #[async_trait]
    impl ItemApi for OwnerApi {
        async fn get_item(&self, item: &ItemId, credential: &Credential) -> Result<ItemRecord, FetchError> {
            self.calls.lock().unwrap().push((credential.id(), item.to_string()));
            if credential.id() != CredentialId(2) {
                return Err(FetchError::Unauthorized { status: 403 });
            }
            Ok(ItemRecord {
                id: Some(item.to_string()),
                title: None,
                sold_quantity: item.as_str().trim_start_matches("MLB").parse().ok(),
            })
        }
    }

    struct NoSleep;

    #[async_trait]
    impl Sleeper for NoSleep {
        async fn sleep(&self, _duration: Duration) {}
    }

    struct Fixture {
        _root: TempDir,
        config: AppConfig,
        api: Arc<OwnerApi>,
        ctx: FetchContext,
    }

    fn fixture() -> Fixture {
        let root = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.paths.inbox = root.path().join("XLSX_ML");
        config.paths.ready = root.path().join("XLSX_PRONTO");
        config.paths.done = root.path().join("XLSX_FEITOS");
        config.db_api.path = root.path().join("apis.db");
        std::fs::create_dir(&config.paths.inbox).unwrap();

        let conn = rusqlite::Connection::open(&config.db_api.path).unwrap();
        conn.execute_batch(
            "CREATE TABLE apis_valores (id_api_valor INTEGER PRIMARY KEY, access_token TEXT);
             INSERT INTO apis_valores VALUES (1, 't1'), (2, 't2'), (3, 't3');",
        )
        .unwrap();

        let api = Arc::new(OwnerApi::default());
        let ctx = FetchContext::builder()
            .api(api.clone())
            .sleeper(Arc::new(NoSleep))
            .build()
            .unwrap();

        Fixture {
            _root: root,
            config,
            api,
            ctx,
        }
    }

    fn write_listings(path: &Path, rows: &[(&str, &str, &str, f64)]) {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet().set_name("Anúncios").unwrap();
        for (row, (id, d, e, i)) in (0u32..).zip(rows) {
            ws.write_string(row, 0, *id).unwrap();
            ws.write_string(row, 3, *d).unwrap();
            ws.write_string(row, 4, *e).unwrap();
            ws.write_number(row, 8, *i).unwrap();
        }
        workbook.save(path).unwrap();
    }

    #[tokio::test]
    async fn test_empty_inbox_does_nothing() {
        let fx = fixture();

        let result = execute(&fx.config, &fx.ctx).await.unwrap();

        assert!(matches!(result, RunResult::NothingToDo { .. }));
        assert!(fx.api.calls.lock().unwrap().is_empty());
        assert!(!fx.config.paths.ready.exists());
    }

    #[tokio::test]
    async fn test_full_run() {
        let fx = fixture();
        let input = fx.config.paths.inbox.join("anuncios.xlsx");
        write_listings(
            &input,
            &[
                ("MLB7", "Sem Giro", "Sem Giro", 0.0),
                ("MLB8", "Com Giro", "Sem Giro", 0.0),
                ("MLB9", "Sem Giro", "Sem Giro", 0.0),
                ("MLB7", "Sem Giro", "Sem Giro", 0.0),
            ],
        );

        let RunResult::Completed(summary) = execute(&fx.config, &fx.ctx).await.unwrap() else {
            panic!("expected a completed run");
        };

        assert_eq!(summary.unique.len(), 2);
        assert_eq!(summary.unique.duplicates, 1);
        assert_eq!(summary.credential.as_ref().map(Credential::owner), Some("Lucas"));
        assert_eq!(summary.batch.total_sold(), 16);
        assert!(!input.exists());
        assert_eq!(summary.archived, fx.config.paths.done.join("anuncios.xlsx"));

        let rows = workbook::read_rows(&summary.report, workbook::REPORT_SHEET).unwrap();
        assert_eq!(rows.len(), 3);

        // Probe with C1 (403) then C2, then one request per listing with C2.
        let calls = fx.api.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(c, _)| *c != CredentialId(3)));
    }

    #[tokio::test]
    async fn test_no_matching_rows_writes_empty_report() {
        let fx = fixture();
        let input = fx.config.paths.inbox.join("a.xlsx");
        write_listings(&input, &[("MLB1", "Com Giro", "Com Giro", 2.0)]);

        let RunResult::Completed(summary) = execute(&fx.config, &fx.ctx).await.unwrap() else {
            panic!("expected a completed run");
        };

        assert!(summary.credential.is_none());
        assert!(summary.batch.records.is_empty());
        assert!(summary.report.exists());
        assert!(fx.api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_everywhere_is_fatal() {
        let mut fx = fixture();
        fx.config.credential_ids = vec![1, 3];
        let input = fx.config.paths.inbox.join("a.xlsx");
        write_listings(&input, &[("MLB5", "Sem Giro", "Sem Giro", 0.0)]);

        let err = execute(&fx.config, &fx.ctx).await.unwrap_err();

        assert!(err.to_string().contains("No credential is authorized"));
        assert!(input.exists());
        assert!(!fx.config.paths.ready.exists());
    }

    #[tokio::test]
    async fn test_two_files_is_fatal() {
        let fx = fixture();
        write_listings(&fx.config.paths.inbox.join("a.xlsx"), &[]);
        write_listings(&fx.config.paths.inbox.join("b.xlsx"), &[]);

        assert!(execute(&fx.config, &fx.ctx).await.is_err());
        assert!(fx.api.calls.lock().unwrap().is_empty());
    }
}
