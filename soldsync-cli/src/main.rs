// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `SoldSync` CLI - fills a listings spreadsheet with marketplace sold quantities.
//!
//! # Examples
//!
//! ```bash
//! # Process the workbook waiting in ./XLSX_ML
//! soldsync
//!
//! # Show which listings would be fetched, without touching the network
//! soldsync scan
//!
//! # Find the account that owns a listing
//! soldsync probe MLB123456
//!
//! # JSON summary
//! soldsync --format json --pretty
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, probe, run, scan};

// ============================================================================
// CLI Definition
// ============================================================================

/// `SoldSync` CLI - marketplace sold-quantity enrichment.
#[derive(Parser)]
#[command(name = "soldsync")]
#[command(about = "Fills a listings spreadsheet with marketplace sold quantities")]
#[command(long_about = r#"
SoldSync reads the single .xlsx workbook waiting in the inbox directory,
keeps the listings marked "Sem Giro" with no recent sales, looks up how many
units each one has sold and writes a Vendas_<timestamp>.xlsx report.

Directories (relative to the working directory by default):
  XLSX_ML       inbox, must hold exactly one workbook
  XLSX_PRONTO   generated reports
  XLSX_FEITOS   processed inputs

Examples:
  soldsync                       # Process the inbox
  soldsync scan                  # List the listings that would be fetched
  soldsync probe MLB123456       # Find the account owning a listing
  soldsync config show           # Effective configuration
  soldsync --format json         # JSON output
"#)]
#[command(version)]
#[command(author = "SoldSync Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'run' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (default: ./creds.json, then the user config dir).
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Inbox directory override.
    #[arg(long, global = true)]
    pub inbox: Option<PathBuf>,

    /// Report directory override.
    #[arg(long, global = true)]
    pub ready: Option<PathBuf>,

    /// Archive directory override.
    #[arg(long, global = true)]
    pub done: Option<PathBuf>,

    /// Concurrent requests per group.
    #[arg(long, short = 'b', global = true)]
    pub batch_size: Option<NonZeroUsize>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Process the inbox workbook (default if no command specified).
    #[command(visible_alias = "r")]
    Run,

    /// Read and filter the inbox workbook without fetching anything.
    #[command(visible_alias = "s")]
    Scan,

    /// Probe the configured credentials against one listing.
    #[command(visible_alias = "p")]
    Probe(probe::ProbeArgs),

    /// Inspect configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success, including an empty inbox.
    Success = 0,
    /// Any fatal condition.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let default = if verbose { "soldsync=debug,info" } else { "soldsync=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Run) | None => run::run(&cli).await,
        Some(Commands::Scan) => scan::run(&cli).await,
        Some(Commands::Probe(args)) => probe::run(args, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_run() {
        let cli = Cli::try_parse_from(["soldsync"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "soldsync", "scan", "--inbox", "in", "--batch-size", "10", "-f", "json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Scan)));
        assert_eq!(cli.inbox, Some(PathBuf::from("in")));
        assert_eq!(cli.batch_size.map(NonZeroUsize::get), Some(10));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(Cli::try_parse_from(["soldsync", "--batch-size", "0"]).is_err());
    }

    #[test]
    fn test_probe_requires_marketplace_id() {
        assert!(Cli::try_parse_from(["soldsync", "probe", "MLB42"]).is_ok());
        assert!(Cli::try_parse_from(["soldsync", "probe", "ABC"]).is_err());
    }
}
