//! Catalog item identifiers and per-item results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Prefix every marketplace listing identifier carries (e.g. `MLB123456`).
pub const MARKETPLACE_PREFIX: &str = "MLB";

// ============================================================================
// Item Id
// ============================================================================

/// Opaque identifier of a catalog listing.
///
/// Construction guarantees the value is non-empty and contains
/// [`MARKETPLACE_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Validates and wraps an identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        if raw.is_empty() || !raw.contains(MARKETPLACE_PREFIX) {
            return Err(CoreError::InvalidItemId(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Result Record
// ============================================================================

/// Sold quantity resolved for one identifier.
///
/// A value of 0 also stands for "no data": the item was not found, access
/// was denied, or retries were exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// The listing.
    #[serde(rename = "MLB")]
    pub item: ItemId,
    /// Quantity sold.
    #[serde(rename = "Vendas")]
    pub sold: u64,
}

impl ResultRecord {
    /// Creates a record.
    pub fn new(item: ItemId, sold: u64) -> Self {
        Self { item, sold }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_prefixed_ids() {
        assert_eq!(ItemId::parse("MLB123").unwrap().as_str(), "MLB123");
        // The prefix may appear anywhere, matching how listings are exported.
        assert!(ItemId::parse("xMLB9").is_ok());
    }

    #[test]
    fn test_parse_rejects_empty_and_foreign() {
        assert!(ItemId::parse("").is_err());
        assert!(ItemId::parse("MLA123").is_err());
        assert!(matches!(
            "123".parse::<ItemId>(),
            Err(CoreError::InvalidItemId(raw)) if raw == "123"
        ));
    }

    #[test]
    fn test_record_serializes_with_sheet_headers() {
        let record = ResultRecord::new(ItemId::parse("MLB1").unwrap(), 4);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"MLB": "MLB1", "Vendas": 4}));
    }

    #[test]
    fn test_deserialize_validates() {
        let bad: Result<ItemId, _> = serde_json::from_str("\"ABC\"");
        assert!(bad.is_err());
    }
}
