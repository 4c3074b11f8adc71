// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `SoldSync` Fetch
//!
//! Marketplace HTTP access, credential resolution and the batched fetch
//! pipeline for the `SoldSync` application.
//!
//! ## Host APIs
//!
//! - [`host::http`] - HTTP client with tracing and domain allowlist
//!
//! ## Fetch Pipeline
//!
//! - [`client::ItemApi`] - Trait for reading one listing
//! - [`probe::CredentialResolver`] - Picks the credential that owns a probe listing
//! - [`fetcher::ItemFetcher`] - Per-listing fetch with rate-limit backoff
//! - [`pipeline::BatchPipeline`] - Sequential groups of concurrent fetches
//! - [`context::FetchContext`] - Wires the above together
//!
//! ## Example
//!
//! ```ignore
//! use soldsync_fetch::FetchContext;
//!
//! let ctx = FetchContext::new()?;
//! let credential = ctx.resolver().resolve(&candidates, &items[0]).await;
//! if let Some(credential) = credential {
//!     let report = ctx.pipeline().run(&items, &credential).await;
//! }
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod pipeline;
pub mod probe;
pub mod retry;

#[cfg(test)]
mod testutils;

// Errors
pub use error::{FailureKind, FetchError, HttpError};

// Host APIs
pub use host::http::HttpClient;

// API, resolution & pipeline
pub use client::{DEFAULT_API_BASE, ItemApi, ItemRecord, MarketplaceClient};
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use fetcher::{ItemFetcher, ItemOutcome, Resolution};
pub use pipeline::{BatchPipeline, BatchReport, DEFAULT_BATCH_SIZE, ResolutionCounts};
pub use probe::{CredentialResolver, ProbeAttempt, ProbeVerdict, ResolveOutcome};
pub use retry::{DelaySchedule, RATE_LIMIT_DELAYS, Sleeper, TokioSleeper};
