//! Config command - inspect configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use soldsync_store::AppConfig;

use super::{config_path, load_config};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration, overrides applied.
    Show,

    /// Show the configuration file path in use.
    Path,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::Path => {
            show_paths(cli);
            Ok(())
        }
    }
}

fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match cli.format {
        OutputFormat::Text => println!("{}", render_text(&config)),
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&config)?);
        }
    }
    Ok(())
}

fn show_paths(cli: &Cli) {
    let path = config_path(cli);
    match cli.format {
        OutputFormat::Text => {
            println!("Config file: {}", path.display());
            if let Some(user) = AppConfig::user_path() {
                println!("User config: {}", user.display());
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config": path.display().to_string(),
                    "user": AppConfig::user_path().map(|p| p.display().to_string()),
                })
            );
        }
    }
}

fn render_text(config: &AppConfig) -> String {
    let mut lines = vec![
        "SoldSync Configuration".to_string(),
        "─".repeat(40),
        format!("Credential DB:  {}", config.db_api.path.display()),
        format!("Inbox:          {}", config.paths.inbox.display()),
        format!("Reports:        {}", config.paths.ready.display()),
        format!("Archive:        {}", config.paths.done.display()),
        format!("Worksheet:      {}", config.worksheet),
        format!("Status value:   {}", config.status_sentinel),
        format!(
            "Columns:        id={} status={},{} numeric={}",
            config.columns.item,
            config.columns.primary_status,
            config.columns.secondary_status,
            config.columns.numeric_flag
        ),
        format!("Batch size:     {}", config.batch_size),
        format!("API:            {}", config.api_base),
        format!("Timeout:        {}s", config.request_timeout_secs),
        String::new(),
        "Credentials:".to_string(),
    ];

    for id in &config.credential_ids {
        let owner = config.owner(*id).unwrap_or("(no owner, skipped)");
        lines.push(format!("  #{id} {owner}"));
    }

    lines.join("\n")
}
