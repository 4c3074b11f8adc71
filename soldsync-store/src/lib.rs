// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `SoldSync` Store
//!
//! Everything `SoldSync` reads from or writes to disk.
//!
//! This crate provides:
//!
//! - **AppConfig**: JSON configuration with defaults
//! - **CredentialStore**: Marketplace tokens from the SQLite `apis_valores` table
//! - **Inbox**: Single-workbook inbox scanning and archival
//! - **Workbook**: Listings sheet reader and sales report writer
//!
//! ## Usage
//!
//! ```ignore
//! use soldsync_store::{AppConfig, CredentialStore, InboxScan, inbox, workbook};
//!
//! let config = AppConfig::load_from(&AppConfig::discover())?;
//! let credentials = CredentialStore::new(&config.db_api.path)
//!     .load(&config.credential_ids, &config.owners)?;
//!
//! if let InboxScan::Single(path) = inbox::scan(&config.paths.inbox).await? {
//!     let rows = workbook::read_rows(&path, &config.worksheet)?;
//!     // ...
//! }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod inbox;
pub mod workbook;

pub use config::{AppConfig, CONFIG_FILE_NAME, DatabaseConfig, PathsConfig};
pub use credentials::CredentialStore;
pub use error::StoreError;
pub use inbox::{InboxScan, XLSX_EXTENSION, archive, ensure_dir, scan};
pub use workbook::{REPORT_HEADERS, REPORT_SHEET, read_rows, report_file_name, write_report, write_report_to};
