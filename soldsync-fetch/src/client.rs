//! Marketplace items API.
//!
//! [`ItemApi`] is the seam the resolver and fetcher talk to; the
//! [`MarketplaceClient`] implementation issues `GET /items/{id}` with the
//! credential's bearer token and maps HTTP statuses onto [`FetchError`].

use async_trait::async_trait;
use serde::Deserialize;
use soldsync_core::{Credential, ItemId};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{FetchError, HttpError};
use crate::host::http::{HttpClient, ResponseExt};

/// Public Mercado Livre API root.
pub const DEFAULT_API_BASE: &str = "https://api.mercadolibre.com";

// ============================================================================
// API Response Types
// ============================================================================

/// The parts of an item record this tool reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemRecord {
    /// Listing id as reported by the API.
    #[serde(default)]
    pub id: Option<String>,

    /// Listing title.
    #[serde(default)]
    pub title: Option<String>,

    /// Units sold over the listing's lifetime.
    #[serde(default)]
    pub sold_quantity: Option<u64>,
}

// ============================================================================
// Item API
// ============================================================================

/// Read access to marketplace listings.
#[async_trait]
pub trait ItemApi: Send + Sync {
    /// Fetches one listing using the given credential.
    async fn get_item(&self, item: &ItemId, credential: &Credential) -> Result<ItemRecord, FetchError>;
}

// ============================================================================
// Marketplace Client
// ============================================================================

/// [`ItemApi`] over HTTPS.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http: HttpClient,
    api_base: Url,
}

impl MarketplaceClient {
    /// Creates a client for `api_base`; requests are restricted to its host.
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, HttpError> {
        let api_base = Url::parse(api_base).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        let host = api_base
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?
            .to_string();

        let http = HttpClient::with_timeout(timeout)?.with_allowed_domains(vec![host]);

        Ok(Self { http, api_base })
    }

    /// Builds `{api_base}/items/{id}` with the id percent-encoded.
    pub fn item_url(&self, item: &ItemId) -> Result<Url, HttpError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| HttpError::InvalidUrl(format!("{} cannot be a base", self.api_base)))?
            .pop_if_empty()
            .push("items")
            .push(item.as_str());
        Ok(url)
    }
}

#[async_trait]
impl ItemApi for MarketplaceClient {
    #[instrument(skip(self, credential), fields(item = %item, credential = %credential.id()))]
    async fn get_item(&self, item: &ItemId, credential: &Credential) -> Result<ItemRecord, FetchError> {
        let url = self.item_url(item)?;

        let response = self
            .http
            .get_with_auth(url.as_str(), &credential.bearer_header())
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, "Item request failed");
            return Err(FetchError::from_status(status, response.retry_after_secs()));
        }

        let body = response.text().await.map_err(HttpError::from)?;
        let record: ItemRecord = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse item response");
            FetchError::Json(e)
        })?;

        Ok(record)
    }
}

// ============================================================================
// Tests
// ============================================================================
