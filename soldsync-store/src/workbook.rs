//! Workbook I/O: reading the listings sheet and writing the sales report.

use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::Utc;
use rust_xlsxwriter::Workbook;
use soldsync_core::{Cell, ResultRecord};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::error::StoreError;

/// Name of the sheet in the generated report.
pub const REPORT_SHEET: &str = "Vendas";

/// Header row of the generated report.
pub const REPORT_HEADERS: [&str; 2] = ["MLB", "Vendas"];

// ============================================================================
// Input
// ============================================================================

/// Reads every row of `sheet` as positional cells.
///
/// Column 0 is always spreadsheet column A, even when the sheet's used range
/// starts further right.
#[instrument(skip_all, fields(path = %path.display(), sheet = sheet))]
pub fn read_rows(path: &Path, sheet: &str) -> Result<Vec<Vec<Cell>>, StoreError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(StoreError::MissingWorksheet(sheet.to_string()));
    }

    let range = workbook.worksheet_range(sheet)?;
    let offset = range.start().map_or(0, |(_, col)| col as usize);

    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| {
            let mut cells = vec![Cell::Empty; offset];
            cells.extend(row.iter().map(to_cell));
            cells
        })
        .collect();

    info!(rows = rows.len(), "Read listings sheet");
    Ok(rows)
}

#[allow(clippy::cast_precision_loss)]
fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Float(n) => Cell::Number(*n),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

// ============================================================================
// Output
// ============================================================================

/// Report file name for the given timestamp.
pub fn report_file_name(unix_millis: i64) -> String {
    format!("{REPORT_SHEET}_{unix_millis}.xlsx")
}

/// Writes the report into `dir` as `Vendas_<unix-millis>.xlsx`.
pub fn write_report(dir: &Path, records: &[ResultRecord]) -> Result<PathBuf, StoreError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(Utc::now().timestamp_millis()));
    write_report_to(&path, records)?;
    Ok(path)
}

/// Writes the report to an explicit path.
#[allow(clippy::cast_precision_loss)]
#[instrument(skip_all, fields(path = %path.display(), records = records.len()))]
pub fn write_report_to(path: &Path, records: &[ResultRecord]) -> Result<(), StoreError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name(REPORT_SHEET)?;

    for (col, header) in (0u16..).zip(REPORT_HEADERS) {
        sheet.write_string(0, col, header)?;
    }

    for (row, record) in (1u32..).zip(records) {
        sheet.write_string(row, 0, record.item.as_str())?;
        sheet.write_number(row, 1, record.sold as f64)?;
    }

    workbook.save(path)?;
    debug!("Report saved");
    Ok(())
}
