//! Listing filter and deduplication.
//!
//! Reduces the typed input rows to the ordered set of unique listing
//! identifiers worth querying.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::models::{ItemId, ListingRow};

/// Status both status columns must carry for a listing to be queried.
pub const DEFAULT_STATUS_SENTINEL: &str = "Sem Giro";

// ============================================================================
// Unique Items
// ============================================================================

/// Output of [`ListingFilter::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UniqueItems {
    /// Unique identifiers in first-occurrence order.
    pub items: Vec<ItemId>,
    /// Rows that passed the predicate, duplicates included.
    pub matched: usize,
    /// Rows dropped as repeats of an earlier identifier.
    pub duplicates: usize,
}

impl UniqueItems {
    /// Number of unique identifiers.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when no row passed the filter.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First identifier, used as the credential probe.
    pub fn first(&self) -> Option<&ItemId> {
        self.items.first()
    }
}

// ============================================================================
// Listing Filter
// ============================================================================

/// Row predicate plus order-preserving deduplication.
#[derive(Debug, Clone)]
pub struct ListingFilter {
    sentinel: String,
}

impl ListingFilter {
    /// Creates a filter matching the given status sentinel.
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    /// Returns the identifier of a row that passes the predicate.
    ///
    /// A row passes when its identifier is present and carries the
    /// marketplace prefix, both status columns trim to the sentinel, and the
    /// numeric column is exactly zero.
    pub fn accepts(&self, row: &ListingRow) -> Option<ItemId> {
        let raw = row.item_id.as_deref()?;
        let id = ItemId::parse(raw).ok()?;

        let status_ok = |status: &Option<String>| {
            status.as_deref().is_some_and(|s| s.trim() == self.sentinel)
        };

        #[allow(clippy::float_cmp)]
        let zero = row.numeric_flag.is_some_and(|n| n == 0.0);

        (status_ok(&row.primary_status) && status_ok(&row.secondary_status) && zero).then_some(id)
    }

    /// Filters and deduplicates rows, keeping first occurrences in order.
    pub fn apply<'a, I>(&self, rows: I) -> UniqueItems
    where
        I: IntoIterator<Item = &'a ListingRow>,
    {
        let mut seen = HashSet::new();
        let mut out = UniqueItems::default();

        for row in rows {
            let Some(id) = self.accepts(row) else {
                continue;
            };
            out.matched += 1;

            if seen.insert(id.clone()) {
                out.items.push(id);
            } else {
                trace!(item = %id, "Duplicate listing");
                out.duplicates += 1;
            }
        }

        debug!(
            unique = out.items.len(),
            matched = out.matched,
            duplicates = out.duplicates,
            "Filtered listing rows"
        );
        out
    }
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_SENTINEL)
    }
}

// ============================================================================
// Tests
// ============================================================================
