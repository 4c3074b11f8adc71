//! Batch pipeline for fetching many listings.
//!
//! The pipeline splits the identifiers into consecutive groups of at most
//! `batch_size`. Groups run strictly one after another; inside a group every
//! fetch runs concurrently on the calling task and the whole group is joined
//! before the next one starts, backoff sleeps included.

use futures::future::join_all;
use serde::Serialize;
use soldsync_core::{Credential, ItemId, ResultRecord};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tracing::{info, instrument};

use crate::fetcher::{ItemFetcher, ItemOutcome, Resolution};

/// Default number of concurrent fetches per group.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(n) => n,
    None => unreachable!(),
};

// ============================================================================
// Batch Report
// ============================================================================

/// Per-resolution counters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionCounts {
    /// Listings fetched successfully.
    pub sold: usize,
    /// Listings that returned 404.
    pub not_found: usize,
    /// Listings rejected with 401/403.
    pub unauthorized: usize,
    /// Listings that exhausted the retry schedule.
    pub gave_up: usize,
    /// Listings that failed for any other reason.
    pub failed: usize,
}

impl ResolutionCounts {
    fn record(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Sold => self.sold += 1,
            Resolution::NotFound => self.not_found += 1,
            Resolution::Unauthorized => self.unauthorized += 1,
            Resolution::GaveUp => self.gave_up += 1,
            Resolution::Failed => self.failed += 1,
        }
    }

    /// Listings that resolved to 0 because of a failure.
    pub fn unresolved(&self) -> usize {
        self.not_found + self.unauthorized + self.gave_up + self.failed
    }
}

/// The outcome of a batch pipeline run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One record per input identifier, in input order.
    pub records: Vec<ResultRecord>,
    /// Groups processed.
    pub groups: usize,
    /// HTTP requests issued, retries included.
    pub requests: u64,
    /// Resolution counters.
    pub counts: ResolutionCounts,
    /// Wall time of the run.
    pub duration: Duration,
}

impl BatchReport {
    fn push(&mut self, outcome: ItemOutcome) {
        self.counts.record(outcome.resolution);
        self.requests += u64::from(outcome.requests);
        self.records.push(ResultRecord::new(outcome.item, outcome.value));
    }

    /// Sum of all sold quantities.
    pub fn total_sold(&self) -> u64 {
        self.records.iter().map(|r| r.sold).sum()
    }
}

// ============================================================================
// Batch Pipeline
// ============================================================================

/// Fetches a list of listings in sequential, internally concurrent groups.
#[derive(Debug, Clone)]
pub struct BatchPipeline {
    fetcher: ItemFetcher,
    batch_size: NonZeroUsize,
}

impl BatchPipeline {
    /// Creates a pipeline.
    pub fn new(fetcher: ItemFetcher, batch_size: NonZeroUsize) -> Self {
        Self { fetcher, batch_size }
    }

    /// Maximum fetches in flight at once.
    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// One record per identifier, in input order.
    pub async fn process(&self, items: &[ItemId], credential: &Credential) -> Vec<ResultRecord> {
        self.run(items, credential).await.records
    }

    /// Runs every group and reports counters alongside the records.
    #[instrument(skip(self, items, credential), fields(items = items.len(), batch_size = self.batch_size.get()))]
    pub async fn run(&self, items: &[ItemId], credential: &Credential) -> BatchReport {
        let start = Instant::now();
        let mut report = BatchReport {
            records: Vec::with_capacity(items.len()),
            ..BatchReport::default()
        };

        let groups = items.len().div_ceil(self.batch_size.get());
        info!(groups, credential = %credential, "Executing batch pipeline");

        for (index, group) in items.chunks(self.batch_size.get()).enumerate() {
            info!(group = index + 1, groups, size = group.len(), "Processing group");

            let outcomes = join_all(
                group
                    .iter()
                    .map(|item| self.fetcher.fetch_outcome(item, credential)),
            )
            .await;

            for outcome in outcomes {
                report.push(outcome);
            }
            report.groups += 1;
        }

        report.duration = start.elapsed();
        info!(
            records = report.records.len(),
            requests = report.requests,
            sold = report.counts.sold,
            unresolved = report.counts.unresolved(),
            duration = ?report.duration,
            "Batch pipeline finished"
        );
        report
    }
}

// ============================================================================
// Tests
// ============================================================================
