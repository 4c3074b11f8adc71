//! Probe command - find which configured credential owns a listing.

use anyhow::{Result, bail};
use clap::Args;
use soldsync_core::ItemId;
use tracing::info;

use super::{fetch_context, load_config, load_credentials};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the probe command.
#[derive(Args)]
pub struct ProbeArgs {
    /// Listing identifier, e.g. MLB123456.
    pub item: ItemId,
}

/// Runs the probe command.
pub async fn run(args: &ProbeArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let credentials = load_credentials(&config)?;
    let ctx = fetch_context(&config)?;

    info!(item = %args.item, candidates = credentials.len(), "Probing credentials");
    let outcome = ctx.resolver().resolve_detailed(&credentials, &args.item).await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_probe(&outcome));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_probe(&outcome)?);
        }
    }

    if !outcome.is_resolved() {
        bail!("No credential is authorized for listing {}", args.item);
    }
    Ok(())
}
