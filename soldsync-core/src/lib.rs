// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `SoldSync` Core
//!
//! Core types and the listing filter for the `SoldSync` application.
//!
//! This crate provides the foundational abstractions used across all other
//! `SoldSync` crates, including:
//!
//! - Domain models (credentials, listing identifiers, results, input rows)
//! - The filter/deduplication stage that turns raw rows into identifiers
//! - Error types
//!
//! ## Key Types
//!
//! - [`Credential`] - Marketplace bearer token and its owner
//! - [`ItemId`] - Validated listing identifier
//! - [`ResultRecord`] - Sold quantity for one listing
//! - [`ListingRow`] / [`Cell`] / [`ColumnLayout`] - Typed input rows
//! - [`ListingFilter`] / [`UniqueItems`] - Filter and deduplication

pub mod error;
pub mod filter;
pub mod models;

pub use error::CoreError;

pub use filter::{DEFAULT_STATUS_SENTINEL, ListingFilter, UniqueItems};

pub use models::{
    Cell, ColumnLayout, Credential, CredentialId, ItemId, ListingRow, MARKETPLACE_PREFIX,
    ResultRecord,
};
