//! Configuration management.
//!
//! The configuration is a JSON document, `creds.json` by convention. Every
//! field has a default, but the file itself must exist: it is where the
//! credential database lives.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use soldsync_core::{ColumnLayout, DEFAULT_STATUS_SENTINEL};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "creds.json";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credential database.
    #[serde(default)]
    pub db_api: DatabaseConfig,
    /// Owner label per credential id.
    #[serde(default = "default_owners")]
    pub owners: BTreeMap<u32, String>,
    /// Credential ids to load, in probe order.
    #[serde(default = "default_credential_ids")]
    pub credential_ids: Vec<u32>,
    /// Working directories.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Name of the listings sheet in the input workbook.
    #[serde(default = "default_worksheet")]
    pub worksheet: String,
    /// Positions of the columns the filter reads.
    #[serde(default)]
    pub columns: ColumnLayout,
    /// Status value a listing must carry in both status columns.
    #[serde(default = "default_sentinel")]
    pub status_sentinel: String,
    /// Concurrent fetches per group.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Marketplace API root.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

/// Credential database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file holding the `apis_valores` table.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

/// Inbox, output and archive directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Where the input workbook is dropped.
    #[serde(default = "default_inbox")]
    pub inbox: PathBuf,
    /// Where reports are written.
    #[serde(default = "default_ready")]
    pub ready: PathBuf,
    /// Where processed inputs are moved.
    #[serde(default = "default_done")]
    pub done: PathBuf,
}

fn default_owners() -> BTreeMap<u32, String> {
    BTreeMap::from([
        (1, "Silvio".to_string()),
        (2, "Lucas".to_string()),
        (3, "Leandro".to_string()),
    ])
}

fn default_credential_ids() -> Vec<u32> {
    vec![1, 2, 3]
}

fn default_worksheet() -> String {
    "Anúncios".to_string()
}

fn default_sentinel() -> String {
    DEFAULT_STATUS_SENTINEL.to_string()
}

fn default_batch_size() -> usize {
    50
}

fn default_api_base() -> String {
    "https://api.mercadolibre.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_db_path() -> PathBuf {
    PathBuf::from("soldsync.db")
}

fn default_inbox() -> PathBuf {
    PathBuf::from("./XLSX_ML")
}

fn default_ready() -> PathBuf {
    PathBuf::from("./XLSX_PRONTO")
}

fn default_done() -> PathBuf {
    PathBuf::from("./XLSX_FEITOS")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            inbox: default_inbox(),
            ready: default_ready(),
            done: default_done(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_api: DatabaseConfig::default(),
            owners: default_owners(),
            credential_ids: default_credential_ids(),
            paths: PathsConfig::default(),
            worksheet: default_worksheet(),
            columns: ColumnLayout::default(),
            status_sentinel: default_sentinel(),
            batch_size: default_batch_size(),
            api_base: default_api_base(),
            request_timeout_secs: default_timeout(),
        }
    }
}

impl AppConfig {
    /// Returns the user-level configuration path.
    ///
    /// - Linux: `~/.config/soldsync/creds.json`
    /// - macOS: `~/Library/Application Support/soldsync/creds.json`
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("soldsync").join(CONFIG_FILE_NAME))
    }

    /// Finds the configuration file: `./creds.json` first, then the
    /// user-level path.
    pub fn discover() -> PathBuf {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }
        match Self::user_path() {
            Some(path) if path.exists() => path,
            _ => local,
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found");
            return Err(StoreError::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Rejects values no run could succeed with.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.batch_size == 0 {
            return Err(StoreError::Config("batch_size must be at least 1".to_string()));
        }
        if self.credential_ids.is_empty() {
            return Err(StoreError::Config("credential_ids is empty".to_string()));
        }
        if self.worksheet.trim().is_empty() {
            return Err(StoreError::Config("worksheet name is empty".to_string()));
        }
        Ok(())
    }

    /// Owner label for a credential id.
    pub fn owner(&self, id: u32) -> Option<&str> {
        self.owners.get(&id).map(String::as_str)
    }
}
