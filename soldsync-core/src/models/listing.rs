//! Typed listing rows read from the input spreadsheet.
//!
//! Spreadsheet readers produce positional [`Cell`]s; a [`ColumnLayout`]
//! turns them into a [`ListingRow`] with named fields once, at ingestion,
//! so the filter never deals with column positions.

use serde::{Deserialize, Serialize};

// ============================================================================
// Cell
// ============================================================================

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Blank cell.
    #[default]
    Empty,
    /// Text cell.
    Text(String),
    /// Numeric cell (integers are widened).
    Number(f64),
    /// Boolean cell.
    Bool(bool),
}

impl Cell {
    /// Returns the text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric content, if this is a numeric cell.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Cell {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

// ============================================================================
// Column Layout
// ============================================================================

/// Zero-based column positions of the fields the filter needs.
///
/// Defaults follow the listing export: identifier in A, the two status
/// columns in D and E, the numeric column in I.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    /// Listing identifier column.
    pub item: usize,
    /// First status column.
    pub primary_status: usize,
    /// Second status column.
    pub secondary_status: usize,
    /// Numeric column that must be zero.
    pub numeric_flag: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            item: 0,
            primary_status: 3,
            secondary_status: 4,
            numeric_flag: 8,
        }
    }
}

impl ColumnLayout {
    /// Builds a typed row from positional cells. Missing cells read as empty.
    pub fn row(&self, cells: &[Cell]) -> ListingRow {
        let text = |idx: usize| {
            cells
                .get(idx)
                .and_then(Cell::as_text)
                .map(str::to_string)
        };

        ListingRow {
            item_id: text(self.item).filter(|s| !s.is_empty()),
            primary_status: text(self.primary_status),
            secondary_status: text(self.secondary_status),
            numeric_flag: cells.get(self.numeric_flag).and_then(Cell::as_number),
        }
    }
}

// ============================================================================
// Listing Row
// ============================================================================

/// One input row with the fields relevant to filtering.
///
/// Non-text values in text fields and non-numeric values in the numeric
/// field are `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingRow {
    /// Raw identifier, non-empty when present.
    pub item_id: Option<String>,
    /// First status column.
    pub primary_status: Option<String>,
    /// Second status column.
    pub secondary_status: Option<String>,
    /// Numeric column.
    pub numeric_flag: Option<f64>,
}

impl ListingRow {
    /// Convenience constructor used by tests and callers with typed data.
    pub fn new(
        item_id: impl Into<String>,
        primary_status: impl Into<String>,
        secondary_status: impl Into<String>,
        numeric_flag: f64,
    ) -> Self {
        let item_id = item_id.into();
        Self {
            item_id: (!item_id.is_empty()).then_some(item_id),
            primary_status: Some(primary_status.into()),
            secondary_status: Some(secondary_status.into()),
            numeric_flag: Some(numeric_flag),
        }
    }
}
