//! Resilient per-listing fetch.
//!
//! [`ItemFetcher::fetch`] never fails: every terminal failure resolves to a
//! sold quantity of 0 and a log line. Only rate limiting is retried, on the
//! fixed [`DelaySchedule`].

use serde::Serialize;
use soldsync_core::{Credential, ItemId};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::client::{ItemApi, ItemRecord};
use crate::error::{FailureKind, FetchError};
use crate::retry::{DelaySchedule, Sleeper};

// ============================================================================
// Resolution
// ============================================================================

/// How a listing fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The API returned the listing.
    Sold,
    /// 404.
    NotFound,
    /// 401/403 after the credential was already selected.
    Unauthorized,
    /// Rate limited past the end of the delay schedule.
    GaveUp,
    /// Network, server, or decode failure.
    Failed,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sold => "sold",
            Self::NotFound => "not found",
            Self::Unauthorized => "unauthorized",
            Self::GaveUp => "gave up",
            Self::Failed => "failed",
        })
    }
}

/// Final state of one listing fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    /// The listing.
    pub item: ItemId,
    /// Sold quantity; 0 for every resolution other than `Sold`.
    pub value: u64,
    /// Requests issued, including the first.
    pub requests: u32,
    /// How the fetch ended.
    pub resolution: Resolution,
}

// ============================================================================
// Fetch Attempt
// ============================================================================

/// Private retry bookkeeping for one in-flight fetch.
#[derive(Debug)]
struct FetchAttempt<'a> {
    item: &'a ItemId,
    attempt_count: usize,
    last_delay_index: Option<usize>,
    requests: u32,
}

/// Next step of the state machine.
#[derive(Debug, PartialEq, Eq)]
enum FetchState {
    /// Wait, then issue the request again.
    Backoff(Duration),
    /// Terminal.
    Done { value: u64, resolution: Resolution },
}

impl<'a> FetchAttempt<'a> {
    fn new(item: &'a ItemId) -> Self {
        Self {
            item,
            attempt_count: 0,
            last_delay_index: None,
            requests: 0,
        }
    }

    /// Classifies one response and advances the attempt counter on backoff.
    fn on_response(
        &mut self,
        response: Result<ItemRecord, FetchError>,
        schedule: &DelaySchedule,
    ) -> FetchState {
        let item = self.item;
        let error = match response {
            Ok(record) => {
                let value = record.sold_quantity.unwrap_or_else(|| {
                    warn!(item = %item, "Listing has no sold_quantity, using 0");
                    0
                });
                debug!(item = %item, sold = value, requests = self.requests, "Fetched listing");
                return FetchState::Done {
                    value,
                    resolution: Resolution::Sold,
                };
            }
            Err(error) => error,
        };

        let kind = error.kind();
        if kind.is_transient() {
            if let Some(delay) = schedule.delay_for(self.attempt_count) {
                warn!(
                    item = %item,
                    attempt = self.attempt_count + 1,
                    max_attempts = schedule.len(),
                    delay_secs = delay.as_secs(),
                    "Rate limited, retrying"
                );
                self.last_delay_index = Some(self.attempt_count);
                self.attempt_count += 1;
                return FetchState::Backoff(delay);
            }
        }

        let resolution = match kind {
            FailureKind::RateLimited => {
                error!(
                    item = %item,
                    attempts = self.attempt_count,
                    last_delay_index = ?self.last_delay_index,
                    "Retry limit reached, giving up"
                );
                Resolution::GaveUp
            }
            FailureKind::NotFound => {
                info!(item = %item, "Listing not found");
                Resolution::NotFound
            }
            FailureKind::Unauthorized => {
                error!(item = %item, error = %error, "Token invalid or expired for listing");
                Resolution::Unauthorized
            }
            FailureKind::Other => {
                error!(item = %item, error = %error, "Failed to fetch listing");
                Resolution::Failed
            }
        };

        FetchState::Done { value: 0, resolution }
    }
}

// ============================================================================
// Item Fetcher
// ============================================================================

/// Fetches sold quantities, retrying rate limits on a fixed schedule.
#[derive(Clone)]
pub struct ItemFetcher {
    api: Arc<dyn ItemApi>,
    sleeper: Arc<dyn Sleeper>,
    schedule: DelaySchedule,
}

impl ItemFetcher {
    /// Creates a fetcher with the standard rate-limit schedule.
    pub fn new(api: Arc<dyn ItemApi>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            api,
            sleeper,
            schedule: DelaySchedule::rate_limit(),
        }
    }

    /// Returns the backoff schedule in use.
    pub fn schedule(&self) -> &DelaySchedule {
        &self.schedule
    }

    /// Sold quantity for `item`, or 0 if it cannot be resolved.
    pub async fn fetch(&self, item: &ItemId, credential: &Credential) -> u64 {
        self.fetch_outcome(item, credential).await.value
    }

    /// Runs the fetch state machine to completion.
    pub async fn fetch_outcome(&self, item: &ItemId, credential: &Credential) -> ItemOutcome {
        let mut attempt = FetchAttempt::new(item);

        loop {
            attempt.requests += 1;
            let response = self.api.get_item(item, credential).await;

            match attempt.on_response(response, &self.schedule) {
                FetchState::Backoff(delay) => self.sleeper.sleep(delay).await,
                FetchState::Done { value, resolution } => {
                    return ItemOutcome {
                        item: item.clone(),
                        value,
                        requests: attempt.requests,
                        resolution,
                    };
                }
            }
        }
    }
}

impl fmt::Debug for ItemFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemFetcher")
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
