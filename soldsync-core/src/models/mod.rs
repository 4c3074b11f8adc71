//! Domain models for SoldSync.
//!
//! ## Submodules
//!
//! - [`credential`] - Marketplace credentials ([`Credential`], [`CredentialId`])
//! - [`item`] - Listing identifiers and results ([`ItemId`], [`ResultRecord`])
//! - [`listing`] - Typed spreadsheet rows ([`ListingRow`], [`Cell`], [`ColumnLayout`])

mod credential;
mod item;
mod listing;

pub use credential::{Credential, CredentialId};
pub use item::{ItemId, MARKETPLACE_PREFIX, ResultRecord};
pub use listing::{Cell, ColumnLayout, ListingRow};
