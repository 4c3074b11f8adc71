//! Fetch context wiring the item API, the sleeper and settings.
//!
//! The context is the one place the resolver, fetcher and pipeline get their
//! collaborators from, so tests can swap in fakes through the builder.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use crate::client::{DEFAULT_API_BASE, ItemApi, MarketplaceClient};
use crate::error::HttpError;
use crate::fetcher::ItemFetcher;
use crate::host::http::DEFAULT_TIMEOUT_SECS;
use crate::pipeline::{BatchPipeline, DEFAULT_BATCH_SIZE};
use crate::probe::CredentialResolver;
use crate::retry::{Sleeper, TokioSleeper};

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Concurrent fetches per group.
    pub batch_size: NonZeroUsize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Marketplace API root.
    pub api_base: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Shared collaborators for one run.
#[derive(Clone)]
pub struct FetchContext {
    /// Listing reads.
    pub api: Arc<dyn ItemApi>,
    /// Backoff waits.
    pub sleeper: Arc<dyn Sleeper>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context talking to the public API with default settings.
    pub fn new() -> Result<Self, HttpError> {
        Self::builder().build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Credential resolver over this context's API.
    pub fn resolver(&self) -> CredentialResolver {
        CredentialResolver::new(Arc::clone(&self.api))
    }

    /// Per-listing fetcher over this context's API and sleeper.
    pub fn fetcher(&self) -> ItemFetcher {
        ItemFetcher::new(Arc::clone(&self.api), Arc::clone(&self.sleeper))
    }

    /// Batch pipeline sized from the settings.
    pub fn pipeline(&self) -> BatchPipeline {
        BatchPipeline::new(self.fetcher(), self.settings.batch_size)
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a [`FetchContext`].
#[derive(Default)]
pub struct FetchContextBuilder {
    api: Option<Arc<dyn ItemApi>>,
    sleeper: Option<Arc<dyn Sleeper>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the item API. Without one, a [`MarketplaceClient`] is built.
    pub fn api(mut self, api: Arc<dyn ItemApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Sets the sleeper.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Sets the group size.
    pub fn batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.settings.batch_size = batch_size;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Sets the API root.
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.settings.api_base = api_base.into();
        self
    }

    /// Builds the fetch context.
    pub fn build(self) -> Result<FetchContext, HttpError> {
        let api: Arc<dyn ItemApi> = match self.api {
            Some(api) => api,
            None => Arc::new(MarketplaceClient::new(
                &self.settings.api_base,
                self.settings.timeout,
            )?),
        };

        Ok(FetchContext {
            api,
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            settings: self.settings,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
